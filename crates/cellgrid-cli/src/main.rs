//! cellgrid CLI - replays cell scripts against a sheet

mod script;

use anyhow::{Context, Result};
use cellgrid::{SheetOptions, DEFAULT_MAX_DEPTH};
use clap::Parser;
use log::{info, LevelFilter};
use script::{parse_value, Session};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cellgrid")]
#[command(
    author,
    version,
    about = "Run set/get/edit/delete commands against an in-memory cell grid"
)]
struct Cli {
    /// Script file with one command per line (default: stdin)
    script: Option<PathBuf>,

    /// Content of unset cells, parsed like a `set` value (default: empty)
    #[arg(short, long)]
    default: Option<String>,

    /// Evaluation depth at which a read gives up with ERROR
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Stop at the first failing command instead of reporting and continuing
    #[arg(long)]
    strict: bool,

    /// Print reads as JSON objects
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = SheetOptions::default().with_max_depth(cli.max_depth);
    if let Some(default) = &cli.default {
        options = options.with_default_value(parse_value(default));
    }

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut session = Session::new(options, cli.json, cli.strict);
    let stats = session.run(input, &mut io::stdout(), &mut io::stderr())?;

    info!(
        "Ran {} commands ({} failed); sheet is {}x{}",
        stats.commands,
        stats.failures,
        session.sheet().dimensions().0,
        session.sheet().dimensions().1
    );

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
