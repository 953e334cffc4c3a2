//! Excel writer for export operations
//!
//! Produces a single-worksheet `.xlsx` workbook with `rust_xlsxwriter`.
//! Cell typing:
//! - numbers and booleans are written as native Excel values
//! - integers outside ±2^53 are written as text so no digits are lost
//! - null and missing fields leave the cell blank
//! - everything else is written as text via [`PlainTextConverter`], cut to
//!   Excel's 32,767-character cell limit

use std::path::Path;

use async_trait::async_trait;
use mongodb::bson::Bson;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use tracing::{debug, warn};

use crate::error::{ExportError, Result};
use crate::formatter::bson_utils::{BsonConverter, PlainTextConverter};
use crate::formatter::{Cell, Table};

use super::{SheetWriter, write_failed};

/// Largest integer magnitude an f64 holds exactly
const MAX_EXACT_INT: u64 = 1 << 53;

/// Longest text Excel stores in one cell, in characters
const MAX_CELL_CHARS: usize = 32_767;

/// Writer for Excel workbooks
pub struct XlsxWriter {
    /// Worksheet name
    sheet_name: String,
    /// Converter for non-numeric values
    converter: PlainTextConverter,
}

impl XlsxWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            converter: PlainTextConverter::new(),
        }
    }

    /// Build the workbook in memory and return the file bytes
    pub(crate) fn render(&self, table: &Table) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        if !table.headers.is_empty() {
            for (col, header) in table.headers.iter().enumerate() {
                worksheet.write_string_with_format(0, col_num(col)?, header, &header_format)?;
            }

            for (index, row) in table.rows.iter().enumerate() {
                let row_num = row_num(index + 1)?;
                for (col, cell) in row.iter().enumerate() {
                    self.write_cell(worksheet, row_num, col_num(col)?, cell)?;
                }
            }
        }

        workbook.save_to_buffer()
    }

    fn write_cell(
        &self,
        worksheet: &mut Worksheet,
        row: RowNum,
        col: ColNum,
        cell: &Cell,
    ) -> std::result::Result<(), XlsxError> {
        let Some(value) = cell.value() else {
            return Ok(());
        };

        match value {
            Bson::Null | Bson::Undefined => {}
            Bson::Int32(n) => {
                worksheet.write_number(row, col, *n)?;
            }
            Bson::Int64(n) if n.unsigned_abs() <= MAX_EXACT_INT => {
                worksheet.write_number(row, col, *n as f64)?;
            }
            Bson::Double(f) if f.is_finite() => {
                worksheet.write_number(row, col, *f)?;
            }
            Bson::Boolean(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            other => {
                let text = self.converter.convert(other);
                worksheet.write_string(row, col, fit_cell_text(text, row, col))?;
            }
        }

        Ok(())
    }
}

/// Cut `text` to the cell limit on a char boundary
fn fit_cell_text(text: String, row: RowNum, col: ColNum) -> String {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(
                "Truncated cell at row {}, column {} from {} to {} characters",
                row,
                col,
                text.chars().count(),
                MAX_CELL_CHARS
            );
            text[..cut].to_string()
        }
        None => text,
    }
}

fn row_num(index: usize) -> std::result::Result<RowNum, XlsxError> {
    RowNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(index: usize) -> std::result::Result<ColNum, XlsxError> {
    ColNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

#[async_trait]
impl SheetWriter for XlsxWriter {
    async fn write_table(&self, table: &Table, path: &Path) -> Result<()> {
        let bytes = self
            .render(table)
            .map_err(|e| ExportError::WriteFailed(format!("Failed to build workbook: {e}")))?;

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| write_failed(path, e))?;

        debug!(
            "Wrote Excel file {} ({} columns, {} rows, {} bytes)",
            path.display(),
            table.column_count(),
            table.row_count(),
            bytes.len()
        );
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}
