//! Cell address resolution

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use ahash::AHashMap;
use lazy_regex::regex_captures;
use std::fmt;

/// A zero-based cell coordinate
///
/// Addresses are written externally as a column letter followed by a 1-based row
/// number ("B12"); internally both parts are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (A=0, B=1, ..., Z=25)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row as u64 + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Translates "A1"-style text into [`CellAddress`] coordinates
///
/// Each resolver owns its own column table; nothing is shared between sheets.
#[derive(Debug, Clone)]
pub struct AddressResolver {
    columns: AHashMap<char, u16>,
}

impl AddressResolver {
    /// Build a resolver with the single-letter column scheme (A-Z)
    pub fn new() -> Self {
        let columns = (b'A'..=b'Z')
            .enumerate()
            .map(|(i, c)| (c as char, i as u16))
            .collect();
        Self { columns }
    }

    /// Resolve an address such as `"b12"` into a zero-based coordinate
    ///
    /// The text is upper-cased, then split into the maximal trailing run of digits
    /// (the row) and whatever precedes it (the column). The column must be exactly
    /// one known letter and the row a positive integer no larger than
    /// [`MAX_ROWS`].
    ///
    /// # Examples
    /// ```
    /// use cellgrid_core::AddressResolver;
    ///
    /// let resolver = AddressResolver::new();
    /// let addr = resolver.resolve("b12").unwrap();
    /// assert_eq!(addr.row, 11);
    /// assert_eq!(addr.col, 1);
    ///
    /// assert!(resolver.resolve("AA1").is_err());
    /// assert!(resolver.resolve("1A").is_err());
    /// ```
    pub fn resolve(&self, address: &str) -> Result<CellAddress> {
        let upper = address.to_uppercase();
        let (_, head, tail) = regex_captures!(r"^(.*?)([0-9]*)$", upper.as_str())
            .ok_or_else(|| Error::invalid_address(&upper))?;

        let col = self
            .column_index(head)
            .ok_or_else(|| Error::invalid_address(&upper))?;

        if tail.is_empty() {
            return Err(Error::invalid_address(&upper));
        }

        // Rows are numbered from 1 externally
        let number = tail
            .parse::<u64>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| Error::invalid_address(&upper))?;
        if number > MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds(number, MAX_ROWS));
        }

        Ok(CellAddress::new((number - 1) as u32, col))
    }

    /// Look up the column index of a single letter, e.g. `"C"` -> 2
    pub fn column_index(&self, letters: &str) -> Option<u16> {
        let mut chars = letters.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.columns.get(&c).copied(),
            _ => None,
        }
    }

    /// The letter naming a column index, if it is within A-Z
    pub fn column_letter(&self, col: u16) -> Option<char> {
        (col < MAX_COLS).then(|| (b'A' + col as u8) as char)
    }

    /// Render a coordinate back into external notation
    pub fn render(&self, address: CellAddress) -> Option<String> {
        let letter = self.column_letter(address.col)?;
        Some(format!("{}{}", letter, address.row as u64 + 1))
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_basic() {
        let resolver = AddressResolver::new();
        assert_eq!(resolver.resolve("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(resolver.resolve("B3").unwrap(), CellAddress::new(2, 1));
        assert_eq!(resolver.resolve("Z100").unwrap(), CellAddress::new(99, 25));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolver = AddressResolver::new();
        assert_eq!(resolver.resolve("c7").unwrap(), resolver.resolve("C7").unwrap());
    }

    #[test]
    fn test_resolve_invalid() {
        let resolver = AddressResolver::new();
        for bad in ["AA1", "B", "1A", "", "1", "A0", "A-1", "A1B2", "#1", "A 1"] {
            assert!(
                matches!(resolver.resolve(bad), Err(Error::InvalidAddress(_))),
                "expected InvalidAddress for {bad:?}"
            );
        }
    }

    #[test]
    fn test_resolve_row_ceiling() {
        let resolver = AddressResolver::new();
        assert_eq!(
            resolver.resolve("Z1048576").unwrap(),
            CellAddress::new(MAX_ROWS - 1, 25)
        );
        assert_eq!(
            resolver.resolve("A1048577"),
            Err(Error::RowOutOfBounds(1_048_577, MAX_ROWS))
        );
        assert_eq!(
            resolver.resolve("Z4294967295"),
            Err(Error::RowOutOfBounds(4_294_967_295, MAX_ROWS))
        );
        assert!(matches!(
            resolver.resolve("A99999999999999999999"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_invalid_address_reports_normalized_text() {
        let resolver = AddressResolver::new();
        assert_eq!(
            resolver.resolve("aa1").unwrap_err(),
            Error::InvalidAddress("AA1".into())
        );
    }

    #[test]
    fn test_column_index_and_letter() {
        let resolver = AddressResolver::new();
        assert_eq!(resolver.column_index("A"), Some(0));
        assert_eq!(resolver.column_index("Z"), Some(25));
        assert_eq!(resolver.column_index("AB"), None);
        assert_eq!(resolver.column_index(""), None);
        assert_eq!(resolver.column_letter(2), Some('C'));
        assert_eq!(resolver.column_letter(26), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellAddress::new(11, 1).to_string(), "B12");
        assert_eq!(CellAddress::new(0, 26).to_string(), "AA1");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
    }

    proptest! {
        #[test]
        fn resolve_then_render_round_trips(col in 0u16..26, row in 1u32..=MAX_ROWS) {
            let resolver = AddressResolver::new();
            let letter = (b'A' + col as u8) as char;
            let text = format!("{letter}{row}");

            let addr = resolver.resolve(&text).unwrap();
            prop_assert_eq!(addr.col, col);
            prop_assert_eq!(addr.row, row - 1);
            prop_assert_eq!(resolver.render(addr), Some(text.clone()));
            prop_assert_eq!(addr.to_string(), text);
        }
    }
}
