//! Sheet configuration

use cellgrid_core::CellValue;

/// Default evaluation depth budget
///
/// Every nested operand and every hop through a reference spends one level, and
/// each level of parenthesis, unary or exponent nesting in a formula spends
/// [`NESTING_COST`](cellgrid_formula::NESTING_COST) more. Together with
/// [`MAX_NESTING`](crate::MAX_NESTING) this keeps evaluation within the stack of
/// an ordinary thread.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options for a [`Sheet`](crate::Sheet)
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOptions {
    /// Content of an unset cell (default: empty)
    pub default_value: CellValue,
    /// Evaluation depth at which a read gives up with `ERROR` (default: 512)
    pub max_depth: usize,
}

impl SheetOptions {
    /// Use a different value to mark unset cells
    pub fn with_default_value<V: Into<CellValue>>(mut self, value: V) -> Self {
        self.default_value = value.into();
        self
    }

    /// Change the evaluation depth budget
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            default_value: CellValue::Empty,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
