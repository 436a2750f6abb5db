//! The cell API
//!
//! [`Sheet`] ties address resolution, the grid store and the formula evaluator
//! together. Structural problems (bad addresses, double initialization, touching
//! cells that were never allocated) are returned as [`Error`]s; evaluation
//! problems become [`Evaluated::Error`] results.

use crate::options::SheetOptions;
use crate::reading::{CellReading, Evaluated};
use cellgrid_core::{AddressResolver, CellAddress, CellValue, Error, Grid, Result};
use cellgrid_formula::{
    evaluate_formula, parse_formula, EvaluationContext, FormulaError, FormulaResult,
    ReferenceResolver,
};
use log::debug;
use std::fmt;

/// A grid of cells holding scalars or formulas
///
/// Each sheet owns its storage and its column table; nothing is shared between
/// instances. A sheet is not synchronized: share it across threads only behind
/// a lock.
#[derive(Debug, Clone)]
pub struct Sheet {
    grid: Grid,
    resolver: AddressResolver,
    options: SheetOptions,
}

impl Sheet {
    /// Create a sheet whose unset cells are empty
    pub fn new() -> Self {
        Self::with_options(SheetOptions::default())
    }

    /// Create a sheet whose unset cells hold `default_value`
    pub fn with_default<V: Into<CellValue>>(default_value: V) -> Self {
        Self::with_options(SheetOptions::default().with_default_value(default_value))
    }

    /// Create a sheet with custom options
    pub fn with_options(options: SheetOptions) -> Self {
        Self {
            grid: Grid::new(options.default_value.clone()),
            resolver: AddressResolver::new(),
            options,
        }
    }

    /// The options this sheet was built with
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Allocated shape as `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    /// Resolve an address against this sheet's column table
    pub fn locate(&self, address: &str) -> Result<CellAddress> {
        self.resolver.resolve(address)
    }

    // === Cell operations ===

    /// Initialize an unset cell
    ///
    /// Fails with [`Error::AlreadySet`] if the cell already holds something other
    /// than the default value (numbers compare by value); use [`Sheet::edit`] to
    /// replace content.
    ///
    /// The grid is dense, so setting a cell allocates every row above it. Row
    /// numbers past [`MAX_ROWS`](crate::MAX_ROWS) fail with
    /// [`Error::RowOutOfBounds`] before anything is allocated.
    pub fn set<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = self.resolver.resolve(address)?;

        if self.grid.is_populated(addr.row, addr.col) {
            return Err(Error::AlreadySet {
                address: address.to_string(),
                value: self.grid.read(addr.row, addr.col).clone(),
            });
        }

        let value = value.into();
        debug!("set {} = {}", addr, value.repr());
        self.grid.write(addr.row, addr.col, value);
        Ok(())
    }

    /// Read a cell's raw content and its evaluated result
    pub fn get(&self, address: &str) -> Result<CellReading> {
        let addr = self.resolver.resolve(address)?;
        let value = self.grid.read(addr.row, addr.col).clone();
        let result = self.evaluate_content(addr, &value);
        Ok(CellReading { value, result })
    }

    /// Read only a cell's evaluated result
    pub fn get_raw(&self, address: &str) -> Result<Evaluated> {
        let addr = self.resolver.resolve(address)?;
        let value = self.grid.read(addr.row, addr.col);
        Ok(self.evaluate_content(addr, value))
    }

    /// Replace the content of an allocated cell
    ///
    /// Any cell inside the allocated grid can be edited, including one that is
    /// currently unset. Cells outside it fail with [`Error::NotInitialized`].
    pub fn edit<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = self.allocated(address)?;
        let value = value.into();
        debug!("edit {} = {}", addr, value.repr());
        self.grid.write(addr.row, addr.col, value);
        Ok(())
    }

    /// Reset an allocated cell to the default value
    ///
    /// The grid keeps its shape. Cells outside it fail with
    /// [`Error::NotInitialized`].
    pub fn delete(&mut self, address: &str) -> Result<()> {
        let addr = self.allocated(address)?;
        debug!("delete {}", addr);
        self.grid.clear(addr.row, addr.col);
        Ok(())
    }

    /// References named by a cell's formula, normalized to upper case
    ///
    /// Cells without a formula, or with one that does not parse, have none.
    pub fn references(&self, address: &str) -> Result<Vec<String>> {
        let addr = self.resolver.resolve(address)?;
        let references = self
            .grid
            .read(addr.row, addr.col)
            .formula_text()
            .and_then(|text| parse_formula(text).ok())
            .map(|ast| {
                ast.references()
                    .into_iter()
                    .map(|r| r.text.to_uppercase())
                    .collect()
            })
            .unwrap_or_default();
        Ok(references)
    }

    // === Evaluation ===

    fn allocated(&self, address: &str) -> Result<CellAddress> {
        let addr = self.resolver.resolve(address)?;
        if !self.grid.contains(addr.row, addr.col) {
            return Err(Error::NotInitialized(address.to_string()));
        }
        Ok(addr)
    }

    /// Turn raw content into a result; formula failures become the error marker
    fn evaluate_content(&self, addr: CellAddress, content: &CellValue) -> Evaluated {
        let formula = match content.formula_text() {
            Some(text) => text,
            None => return Evaluated::Value(content.clone()),
        };

        let ctx = EvaluationContext::new(self, self.options.max_depth);
        match evaluate_formula(formula, &ctx) {
            Ok(value) => Evaluated::Value(value),
            Err(e) => {
                debug!("{} ({}) evaluated to ERROR: {}", addr, formula, e);
                Evaluated::Error
            }
        }
    }
}

impl ReferenceResolver for Sheet {
    fn resolve(&self, reference: &str, depth: usize) -> FormulaResult<CellValue> {
        let addr = self
            .resolver
            .resolve(reference)
            .map_err(|e| FormulaError::InvalidReference(e.to_string()))?;

        let content = self.grid.read(addr.row, addr.col);
        match content.formula_text() {
            Some(formula) => {
                let ctx = EvaluationContext::with_depth(self, depth, self.options.max_depth);
                evaluate_formula(formula, &ctx)
            }
            None => Ok(content.clone()),
        }
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Sheet {
    /// One bracketed row per line, e.g. `[None, 1, '=B1']`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.grid.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(CellValue::repr).collect();
            write!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Evaluated {
        Evaluated::Value(CellValue::Int(n))
    }

    #[test]
    fn test_set_then_get_scalar() {
        let mut sheet = Sheet::new();
        sheet.set("B1", 1).unwrap();
        assert_eq!(
            sheet.get("B1").unwrap(),
            CellReading {
                value: CellValue::Int(1),
                result: int(1),
            }
        );
        assert_eq!(sheet.get_raw("b1").unwrap(), int(1));
    }

    #[test]
    fn test_set_on_populated_cell_fails() {
        let mut sheet = Sheet::new();
        sheet.set("A1", 10).unwrap();
        assert_eq!(
            sheet.set("A1", 11),
            Err(Error::AlreadySet {
                address: "A1".into(),
                value: CellValue::Int(10),
            })
        );
    }

    #[test]
    fn test_set_compares_numbers_by_value() {
        let mut sheet = Sheet::with_default(0);
        sheet.set("A1", 0.0).unwrap();
        sheet.set("A1", 5).unwrap();
        assert_eq!(sheet.get_raw("A1").unwrap(), int(5));
        assert_eq!(
            sheet.set("A1", 0.0),
            Err(Error::AlreadySet {
                address: "A1".into(),
                value: CellValue::Int(5),
            })
        );
    }

    #[test]
    fn test_rows_past_ceiling_are_rejected() {
        let mut sheet = Sheet::new();
        assert_eq!(
            sheet.set("Z4294967295", 1),
            Err(Error::RowOutOfBounds(4_294_967_295, crate::MAX_ROWS))
        );
        assert!(matches!(sheet.get("A1048577"), Err(Error::RowOutOfBounds(..))));
        assert_eq!(sheet.dimensions(), (0, 0));
    }

    #[test]
    fn test_set_after_delete_succeeds() {
        let mut sheet = Sheet::new();
        sheet.set("A1", 10).unwrap();
        sheet.delete("A1").unwrap();
        sheet.set("A1", 11).unwrap();
        assert_eq!(sheet.get_raw("A1").unwrap(), int(11));
    }

    #[test]
    fn test_edit_and_delete_require_allocation() {
        let mut sheet = Sheet::new();
        assert_eq!(sheet.edit("C3", 1), Err(Error::NotInitialized("C3".into())));
        assert_eq!(sheet.delete("C3"), Err(Error::NotInitialized("C3".into())));

        // Allocating C3 makes every cell in the rectangle editable
        sheet.set("C3", 1).unwrap();
        sheet.edit("A1", 5).unwrap();
        sheet.delete("B2").unwrap();
        assert_eq!(sheet.get_raw("A1").unwrap(), int(5));
        assert_eq!(sheet.delete("D1"), Err(Error::NotInitialized("D1".into())));
    }

    #[test]
    fn test_unset_cell_reads_default() {
        let sheet = Sheet::with_default(0);
        assert_eq!(sheet.get_raw("Z99").unwrap(), int(0));
        assert_eq!(sheet.dimensions(), (0, 0));
    }

    #[test]
    fn test_invalid_addresses() {
        let mut sheet = Sheet::new();
        assert!(matches!(sheet.set("AA1", 1), Err(Error::InvalidAddress(_))));
        assert!(matches!(sheet.get("B"), Err(Error::InvalidAddress(_))));
        assert!(matches!(sheet.edit("1A", 1), Err(Error::InvalidAddress(_))));
        assert!(matches!(sheet.delete("A0"), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_self_reference_is_error() {
        let mut sheet = Sheet::new();
        sheet.set("A1", "=A1").unwrap();
        assert_eq!(sheet.get_raw("A1").unwrap(), Evaluated::Error);
    }

    #[test]
    fn test_references() {
        let mut sheet = Sheet::new();
        sheet.set("C1", "=a1 * B2 + 3").unwrap();
        sheet.set("C2", 4).unwrap();
        sheet.set("C3", "=(").unwrap();
        assert_eq!(sheet.references("C1").unwrap(), vec!["A1", "B2"]);
        assert!(sheet.references("C2").unwrap().is_empty());
        assert!(sheet.references("C3").unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        let mut sheet = Sheet::new();
        sheet.set("B1", 1).unwrap();
        sheet.set("A2", "=B1").unwrap();
        assert_eq!(sheet.to_string(), "[None, 1]\n['=B1', None]");
    }

    #[test]
    fn test_sheets_do_not_share_state() {
        let mut first = Sheet::new();
        let second = Sheet::new();
        first.set("A1", 1).unwrap();
        assert_eq!(second.dimensions(), (0, 0));
        assert_eq!(second.get_raw("A1").unwrap(), Evaluated::Value(CellValue::Empty));
    }
}
