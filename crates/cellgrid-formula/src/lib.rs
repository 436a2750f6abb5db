//! # cellgrid-formula
//!
//! Formula parser and evaluator for cellgrid.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST → value), resolving cell references through a
//!   caller-supplied [`ReferenceResolver`]
//! - The arithmetic operator semantics shared by every evaluation
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::CellValue;
//! use cellgrid_formula::{evaluate, parse_formula, EvaluationContext, FormulaResult, ReferenceResolver};
//!
//! struct Constant;
//!
//! impl ReferenceResolver for Constant {
//!     fn resolve(&self, _reference: &str, _depth: usize) -> FormulaResult<CellValue> {
//!         Ok(CellValue::Int(4))
//!     }
//! }
//!
//! let ast = parse_formula("=A1*2+1").unwrap();
//! let ctx = EvaluationContext::new(&Constant, 100);
//! assert_eq!(evaluate(&ast, &ctx).unwrap(), CellValue::Int(9));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod ops;
pub mod parser;

pub use ast::{BinaryOperator, CellReference, FormulaExpr, NumberLiteral, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_formula, EvaluationContext, ReferenceResolver, NESTING_COST};
pub use parser::{parse_formula, parse_formula_bounded, ParsedFormula, MAX_NESTING, MAX_OPERATORS};
