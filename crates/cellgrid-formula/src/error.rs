//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
///
/// None of these reach the caller of a sheet read: they are turned into the
/// `ERROR` result there.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Malformed formula syntax
    #[error("Parse error: {0}")]
    Parse(String),

    /// Parentheses or prefix operators nested past the allowed depth
    #[error("Formula nests deeper than {0} levels")]
    TooDeeplyNested(usize),

    /// Operator applied to a non-numeric operand
    #[error("Unsupported operand type(s) for {op}: {operands}")]
    Type { op: &'static str, operands: String },

    /// Division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Result does not fit the numeric type
    #[error("Numeric overflow in {0}")]
    Overflow(&'static str),

    /// Result is not a real number
    #[error("Math domain error in {0}")]
    Domain(&'static str),

    /// A referenced address could not be resolved
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Evaluation nested deeper than allowed (usually a reference cycle)
    #[error("Maximum evaluation depth of {0} exceeded")]
    DepthExceeded(usize),
}
