//! Command scripts
//!
//! One command per line; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! set B1 1
//! set B3 =B1+B2
//! get B3
//! edit B2 20
//! delete B1
//! ```

use anyhow::{Context, Result};
use cellgrid::{CellValue, Sheet, SheetOptions};
use log::debug;
use serde_json::json;
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

/// Errors in the script text itself
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' takes no value")]
    UnexpectedValue(&'static str),
}

/// A single script command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { address: String, value: CellValue },
    Get { address: String },
    Raw { address: String },
    Edit { address: String, value: CellValue },
    Delete { address: String },
    Deps { address: String },
    Show,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let (name, rest) = split_word(line);
        let (address, rest) = split_word(rest);
        let name = name.to_lowercase();
        let address = (!address.is_empty()).then(|| address.to_string());
        let value = (!rest.is_empty()).then_some(rest);

        let (command, takes_value): (&'static str, bool) = match name.as_str() {
            "set" => ("set", true),
            "edit" => ("edit", true),
            "get" => ("get", false),
            "raw" => ("raw", false),
            "delete" => ("delete", false),
            "deps" => ("deps", false),
            "show" => {
                if address.is_some() {
                    return Err(CommandError::UnexpectedValue("show"));
                }
                return Ok(Command::Show);
            }
            _ => return Err(CommandError::Unknown(name.clone())),
        };

        let address = address.ok_or(CommandError::MissingArgument {
            command,
            argument: "an address",
        })?;

        let value = match (takes_value, value) {
            (true, Some(v)) => Some(parse_value(v)),
            (true, None) => {
                return Err(CommandError::MissingArgument {
                    command,
                    argument: "a value",
                })
            }
            (false, Some(_)) => return Err(CommandError::UnexpectedValue(command)),
            (false, None) => None,
        };

        Ok(match (command, value) {
            ("set", Some(value)) => Command::Set { address, value },
            ("edit", Some(value)) => Command::Edit { address, value },
            ("get", _) => Command::Get { address },
            ("raw", _) => Command::Raw { address },
            ("delete", _) => Command::Delete { address },
            _ => Command::Deps { address },
        })
    }
}

/// Split off the first whitespace-delimited word, returning it and the trimmed rest
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim()),
        None => (text, ""),
    }
}

/// Parse a value the way a script writes it
///
/// Integers and floats become numbers; `"quoted"` text is taken literally;
/// anything else, including formula text, is kept verbatim as text.
pub fn parse_value(text: &str) -> CellValue {
    if let Some(inner) = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return CellValue::text(inner);
    }

    if let Ok(n) = text.parse::<i64>() {
        return CellValue::Int(n);
    }

    // "inf" and "nan" parse as floats but read as words here
    if text.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(n) = text.parse::<f64>() {
            return CellValue::Float(n);
        }
    }

    CellValue::text(text)
}

/// Counters for a finished run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Commands executed
    pub commands: usize,
    /// Commands that failed
    pub failures: usize,
}

/// A sheet plus the output settings of a script run
pub struct Session {
    sheet: Sheet,
    json: bool,
    strict: bool,
}

impl Session {
    pub fn new(options: SheetOptions, json: bool, strict: bool) -> Self {
        Self {
            sheet: Sheet::with_options(options),
            json,
            strict,
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Execute every command in `input`
    ///
    /// Read results go to `out`; failures are reported to `err` and counted,
    /// or abort the run in strict mode.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<RunStats> {
        let mut stats = RunStats::default();

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = line.with_context(|| format!("Failed to read line {}", line_no))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            stats.commands += 1;
            let outcome = trimmed
                .parse::<Command>()
                .map_err(anyhow::Error::from)
                .and_then(|command| self.execute(&command, out));

            if let Err(e) = outcome {
                stats.failures += 1;
                if self.strict {
                    return Err(e.context(format!("line {}: {}", line_no, trimmed)));
                }
                debug!("line {} failed: {:#}", line_no, e);
                writeln!(err, "error: line {}: {}", line_no, e)
                    .context("Failed to write to stderr")?;
            }
        }

        Ok(stats)
    }

    /// Execute one command
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> Result<()> {
        debug!("executing {:?}", command);

        match command {
            Command::Set { address, value } => self.sheet.set(address, value.clone())?,
            Command::Edit { address, value } => self.sheet.edit(address, value.clone())?,
            Command::Delete { address } => self.sheet.delete(address)?,
            Command::Get { address } => {
                let reading = self.sheet.get(address)?;
                if self.json {
                    let line = json!({
                        "address": address,
                        "value": reading.value,
                        "result": reading.result,
                    });
                    writeln!(out, "{}", line)?;
                } else {
                    writeln!(out, "{}: {}", address, reading)?;
                }
            }
            Command::Raw { address } => {
                let result = self.sheet.get_raw(address)?;
                if self.json {
                    writeln!(out, "{}", json!({ "address": address, "result": result }))?;
                } else {
                    writeln!(out, "{}: {}", address, result)?;
                }
            }
            Command::Deps { address } => {
                let references = self.sheet.references(address)?;
                writeln!(out, "{}: {}", address, references.join(", "))?;
            }
            Command::Show => {
                // An empty sheet renders as nothing at all
                if self.sheet.dimensions().0 > 0 {
                    writeln!(out, "{}", self.sheet)?;
                }
            }
        }

        Ok(())
    }
}
