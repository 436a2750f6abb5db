//! Formula Abstract Syntax Tree types

use cellgrid_core::CellValue;
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(NumberLiteral),

    /// Cell reference
    Reference(CellReference),

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },
}

impl FormulaExpr {
    /// Shorthand for building a binary node
    pub fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> Self {
        FormulaExpr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Shorthand for building a unary node
    pub fn unary(op: UnaryOperator, operand: FormulaExpr) -> Self {
        FormulaExpr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Every reference in the expression, left to right
    pub fn references(&self) -> Vec<&CellReference> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                FormulaExpr::Reference(r) => found.push(r),
                FormulaExpr::Number(_) => {}
                FormulaExpr::BinaryOp { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
                FormulaExpr::UnaryOp { operand, .. } => stack.push(operand),
            }
        }
        found
    }
}

/// Numeric literal, keeping integers and floats apart
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    Int(i64),
    Float(f64),
}

impl From<NumberLiteral> for CellValue {
    fn from(n: NumberLiteral) -> Self {
        match n {
            NumberLiteral::Int(i) => CellValue::Int(i),
            NumberLiteral::Float(f) => CellValue::Float(f),
        }
    }
}

/// Cell reference as written in the formula (e.g. `b1`)
///
/// The text is resolved to a coordinate only when the formula is evaluated, so an
/// unresolvable reference surfaces as an evaluation error rather than a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellReference {
    pub text: String,
}

impl CellReference {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl BinaryOperator {
    /// Operator symbol as written in formulas
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "**",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
}

impl UnaryOperator {
    /// Operator symbol as written in formulas
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "unary -",
        }
    }
}
