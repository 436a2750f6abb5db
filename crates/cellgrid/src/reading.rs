//! Values returned by sheet reads

use cellgrid_core::CellValue;
use std::fmt;

/// Text shown for a formula that could not be evaluated
pub const ERROR_MARKER: &str = "ERROR";

/// Evaluated result of a cell
///
/// Evaluation problems (bad syntax, non-numeric operands, reference cycles) are
/// data, not faults: they read back as [`Evaluated::Error`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluated {
    /// The cell's content, or its formula's result
    Value(CellValue),
    /// The formula could not be evaluated
    Error,
}

impl Evaluated {
    /// Check if this is the error marker
    pub fn is_error(&self) -> bool {
        matches!(self, Evaluated::Error)
    }

    /// The value, unless this is the error marker
    pub fn value(&self) -> Option<&CellValue> {
        match self {
            Evaluated::Value(v) => Some(v),
            Evaluated::Error => None,
        }
    }

    /// Literal-style rendering, see [`CellValue::repr`]
    pub fn repr(&self) -> String {
        match self {
            Evaluated::Value(v) => v.repr(),
            Evaluated::Error => format!("'{}'", ERROR_MARKER),
        }
    }
}

impl fmt::Display for Evaluated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluated::Value(v) => write!(f, "{}", v),
            Evaluated::Error => f.write_str(ERROR_MARKER),
        }
    }
}

impl From<CellValue> for Evaluated {
    fn from(value: CellValue) -> Self {
        Evaluated::Value(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Evaluated {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Evaluated::Value(v) => serde::Serialize::serialize(v, serializer),
            Evaluated::Error => serializer.serialize_str(ERROR_MARKER),
        }
    }
}

/// A cell's raw content together with its evaluated result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellReading {
    /// Raw content, formulas verbatim
    pub value: CellValue,
    /// Evaluated result
    pub result: Evaluated,
}

impl fmt::Display for CellReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'value': {}, 'result': {}}}",
            self.value.repr(),
            self.result.repr()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        let reading = CellReading {
            value: CellValue::text("=B1+B2"),
            result: Evaluated::Value(CellValue::Int(3)),
        };
        assert_eq!(reading.to_string(), "{'value': '=B1+B2', 'result': 3}");

        let reading = CellReading {
            value: CellValue::text("=B1+B2"),
            result: Evaluated::Error,
        };
        assert_eq!(reading.to_string(), "{'value': '=B1+B2', 'result': 'ERROR'}");

        let reading = CellReading {
            value: CellValue::Empty,
            result: Evaluated::Value(CellValue::Empty),
        };
        assert_eq!(reading.to_string(), "{'value': None, 'result': None}");
    }

    #[test]
    fn test_accessors() {
        assert!(Evaluated::Error.is_error());
        assert_eq!(Evaluated::Error.value(), None);
        assert_eq!(Evaluated::Value(CellValue::Float(1.0)).value(), Some(&CellValue::Float(1.0)));
        assert_eq!(Evaluated::Error.to_string(), "ERROR");
        assert_eq!(Evaluated::Value(CellValue::Float(1.0)).to_string(), "1.0");
    }
}
