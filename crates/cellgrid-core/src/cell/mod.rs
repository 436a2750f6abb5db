//! Cell-related types
//!
//! This module contains:
//! - [`CellValue`] - The raw content stored in a cell
//! - [`CellAddress`] - A cell's zero-based location
//! - [`AddressResolver`] - Parsing "A1"-style text into a [`CellAddress`]

mod address;
mod value;

pub use address::{AddressResolver, CellAddress};
pub use value::CellValue;
