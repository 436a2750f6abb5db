//! Numeric operator semantics
//!
//! Integers stay integers under `+ - * % **` when both operands are integers;
//! mixing in a float widens to float. Division is always true division.

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use cellgrid_core::CellValue;

/// Operand after type checking
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(n) => n,
        }
    }
}

impl From<Num> for CellValue {
    fn from(n: Num) -> Self {
        match n {
            Num::Int(i) => CellValue::Int(i),
            Num::Float(f) => CellValue::Float(f),
        }
    }
}

fn operands(op: BinaryOperator, left: &CellValue, right: &CellValue) -> FormulaResult<(Num, Num)> {
    match (numeric(left), numeric(right)) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(FormulaError::Type {
            op: op.symbol(),
            operands: format!("'{}' and '{}'", left.type_name(), right.type_name()),
        }),
    }
}

fn numeric(value: &CellValue) -> Option<Num> {
    match value {
        CellValue::Int(n) => Some(Num::Int(*n)),
        CellValue::Float(n) => Some(Num::Float(*n)),
        _ => None,
    }
}

/// Apply a binary operator to two evaluated operands
pub fn apply_binary(op: BinaryOperator, left: &CellValue, right: &CellValue) -> FormulaResult<CellValue> {
    let (l, r) = operands(op, left, right)?;

    let result = match op {
        BinaryOperator::Add => int_or_float(l, r, i64::checked_add, |a, b| a + b, "+")?,
        BinaryOperator::Subtract => int_or_float(l, r, i64::checked_sub, |a, b| a - b, "-")?,
        BinaryOperator::Multiply => int_or_float(l, r, i64::checked_mul, |a, b| a * b, "*")?,
        BinaryOperator::Divide => divide(l, r)?,
        BinaryOperator::Modulo => modulo(l, r)?,
        BinaryOperator::Power => power(l, r)?,
    };

    Ok(result.into())
}

/// Apply a unary operator to an evaluated operand
pub fn apply_unary(op: UnaryOperator, operand: &CellValue) -> FormulaResult<CellValue> {
    let n = numeric(operand).ok_or_else(|| FormulaError::Type {
        op: op.symbol(),
        operands: format!("'{}'", operand.type_name()),
    })?;

    let result = match op {
        UnaryOperator::Negate => match n {
            Num::Int(i) => Num::Int(i.checked_neg().ok_or(FormulaError::Overflow("unary -"))?),
            Num::Float(f) => Num::Float(-f),
        },
    };

    Ok(result.into())
}

fn int_or_float(
    l: Num,
    r: Num,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
    symbol: &'static str,
) -> FormulaResult<Num> {
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => int_op(a, b)
            .map(Num::Int)
            .ok_or(FormulaError::Overflow(symbol)),
        _ => Ok(Num::Float(float_op(l.as_f64(), r.as_f64()))),
    }
}

fn divide(l: Num, r: Num) -> FormulaResult<Num> {
    let divisor = r.as_f64();
    if divisor == 0.0 {
        return Err(FormulaError::DivisionByZero);
    }
    Ok(Num::Float(l.as_f64() / divisor))
}

/// Floored modulo: the result takes the sign of the divisor
fn modulo(l: Num, r: Num) -> FormulaResult<Num> {
    match (l, r) {
        (Num::Int(_), Num::Int(0)) => Err(FormulaError::DivisionByZero),
        (Num::Int(a), Num::Int(b)) => {
            // i64::MIN % -1 overflows in Rust, but the floored result is 0
            let rem = a.checked_rem(b).unwrap_or(0);
            Ok(Num::Int(if rem != 0 && (rem < 0) != (b < 0) { rem + b } else { rem }))
        }
        _ => {
            let (a, b) = (l.as_f64(), r.as_f64());
            if b == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            let rem = a % b;
            Ok(Num::Float(if rem != 0.0 && (rem < 0.0) != (b < 0.0) { rem + b } else { rem }))
        }
    }
}

fn power(l: Num, r: Num) -> FormulaResult<Num> {
    if let (Num::Int(base), Num::Int(exp)) = (l, r) {
        if exp >= 0 {
            return u32::try_from(exp)
                .ok()
                .and_then(|exp| base.checked_pow(exp))
                .map(Num::Int)
                .ok_or(FormulaError::Overflow("**"));
        }
    }

    let (base, exp) = (l.as_f64(), r.as_f64());
    if base == 0.0 && exp < 0.0 {
        return Err(FormulaError::DivisionByZero);
    }

    let result = base.powf(exp);
    if base.is_finite() && exp.is_finite() {
        if result.is_nan() {
            return Err(FormulaError::Domain("**"));
        }
        if result.is_infinite() {
            return Err(FormulaError::Overflow("**"));
        }
    }
    Ok(Num::Float(result))
}
