//! # cellgrid-core
//!
//! Core data structures for cellgrid.
//!
//! This crate provides the fundamental types the rest of the workspace builds on:
//! - [`CellValue`] - Raw cell content (empty, integer, float, text or formula text)
//! - [`CellAddress`] and [`AddressResolver`] - Converting "B12" into a zero-based coordinate
//! - [`Grid`] - The rectangular, growable cell store
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::{AddressResolver, CellValue, Grid};
//!
//! let resolver = AddressResolver::new();
//! let addr = resolver.resolve("B12").unwrap();
//! assert_eq!((addr.row, addr.col), (11, 1));
//!
//! let mut grid = Grid::new(CellValue::Empty);
//! grid.write(addr.row, addr.col, CellValue::Int(7));
//! assert_eq!(grid.read(addr.row, addr.col), &CellValue::Int(7));
//! assert_eq!(grid.dimensions(), (12, 2));
//! ```

pub mod cell;
pub mod error;
pub mod grid;

pub use cell::{AddressResolver, CellAddress, CellValue};
pub use error::{Error, Result};
pub use grid::Grid;

/// Maximum number of rows in a grid
pub const MAX_ROWS: u32 = 1_048_576;

/// Number of addressable columns (single letters A-Z)
pub const MAX_COLS: u16 = 26;
