//! Sheet writers for export operations
//!
//! A [`SheetWriter`] persists one projected [`Table`] to one file. The header
//! row comes first, then one line per table row in order.

use async_trait::async_trait;
use std::path::Path;

use crate::error::{ExportError, Result};
use crate::formatter::Table;

pub mod csv;
pub mod xlsx;

pub use csv::CsvWriter;
pub use xlsx::XlsxWriter;

/// Trait for writing a table to a file format
#[async_trait]
pub trait SheetWriter: Send + Sync {
    /// Write `table` to `path`, replacing any existing file
    async fn write_table(&self, table: &Table, path: &Path) -> Result<()>;

    /// File extension produced by this writer (without the dot)
    fn extension(&self) -> &'static str;
}

/// Wrap an I/O failure while writing `path`
pub(crate) fn write_failed(path: &Path, err: impl std::fmt::Display) -> ExportError {
    ExportError::WriteFailed(format!("{}: {}", path.display(), err))
}
