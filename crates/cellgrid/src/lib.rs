//! # cellgrid
//!
//! An in-memory grid of addressable cells. Each cell holds either a scalar or a
//! formula such as `=A1+B2`; formulas are evaluated on every read, resolving
//! references to the current results of the cells they name.
//!
//! ## Example
//!
//! ```rust
//! use cellgrid::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set("B1", 1).unwrap();
//! sheet.set("B2", 2).unwrap();
//! sheet.set("B3", "=B1+B2").unwrap();
//!
//! assert_eq!(sheet.get("B3").unwrap().result, Evaluated::Value(CellValue::Int(3)));
//!
//! sheet.edit("B2", 20).unwrap();
//! assert_eq!(sheet.get_raw("B3").unwrap(), Evaluated::Value(CellValue::Int(21)));
//!
//! sheet.delete("B1").unwrap();
//! assert!(sheet.get_raw("B3").unwrap().is_error());
//! ```

pub mod options;
pub mod prelude;
pub mod reading;
pub mod sheet;

pub use options::{SheetOptions, DEFAULT_MAX_DEPTH};
pub use reading::{CellReading, Evaluated, ERROR_MARKER};
pub use sheet::Sheet;

// Re-export core types
pub use cellgrid_core::{
    AddressResolver, CellAddress, CellValue, Error, Grid, Result, MAX_COLS, MAX_ROWS,
};

// Re-export formula types
pub use cellgrid_formula::{
    evaluate, evaluate_formula, parse_formula, EvaluationContext, FormulaError, FormulaExpr,
    FormulaResult, ReferenceResolver, MAX_NESTING, MAX_OPERATORS,
};
