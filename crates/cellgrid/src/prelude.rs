//! Prelude module for convenient imports
//!
//! ```rust
//! use cellgrid::prelude::*;
//! ```

pub use crate::{
    CellAddress, CellReading, CellValue, Error, Evaluated, Result, Sheet, SheetOptions,
};
