//! Cell value types

use std::fmt;

/// The raw content stored in a cell
///
/// Content is kept verbatim: formula text keeps its leading `=` and is only parsed
/// when the cell is read.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellValue {
    /// No content
    #[default]
    Empty,

    /// Integer scalar
    Int(i64),

    /// Floating-point scalar
    Float(f64),

    /// Text; formula text when it starts with `=`
    Text(String),
}

impl CellValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if the value is [`CellValue::Empty`]
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the value is a number (integer or float)
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    /// Check if the value is formula text
    pub fn is_formula(&self) -> bool {
        self.formula_text().is_some()
    }

    /// Get the formula text (including the leading `=`) if this is a formula
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) if s.starts_with('=') => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view of the value, widening integers to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Content equality where numbers compare by value, so `Int(0)` matches `Float(0.0)`
    pub fn same_content(&self, other: &CellValue) -> bool {
        match (self, other) {
            (CellValue::Int(a), CellValue::Float(b)) | (CellValue::Float(b), CellValue::Int(a)) => {
                *a as f64 == *b
            }
            _ => self == other,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Text(_) => "text",
        }
    }

    /// Literal-style rendering: text is quoted and empty shows as `None`
    pub fn repr(&self) -> String {
        match self {
            CellValue::Empty => "None".to_string(),
            CellValue::Text(s) => format!("'{}'", s.replace('\'', "\\'")),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(n) => write!(f, "{}", n),
            // Debug keeps the decimal point on whole floats ("1.0")
            CellValue::Float(n) => write!(f, "{:?}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}
