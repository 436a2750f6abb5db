//! Error types for cellgrid-core

use thiserror::Error;

use crate::CellValue;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors surfaced to callers of the grid
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Address text does not match the supported grammar
    #[error("The provided cell index '{0}' is not valid.")]
    InvalidAddress(String),

    /// Row number beyond [`MAX_ROWS`](crate::MAX_ROWS)
    #[error("Row {0} is out of bounds (max: {1})")]
    RowOutOfBounds(u64, u32),

    /// Attempt to initialize a cell that already holds content
    #[error("The cell at '{address}' already has a value ({value}). Use edit() to change existing values.")]
    AlreadySet { address: String, value: CellValue },

    /// Attempt to edit or delete a cell outside the allocated grid
    #[error("The cell at '{0}' has not been initialized yet. Use set() to initialize it.")]
    NotInitialized(String),
}

impl Error {
    /// Create an invalid address error from any address-like text
    pub fn invalid_address<S: Into<String>>(address: S) -> Self {
        Error::InvalidAddress(address.into())
    }
}
