//! CSV writer for export operations
//!
//! Writes the projected table as comma-separated values with a header row.
//! Values containing a comma, quote or line break are quoted, with internal
//! quotes doubled.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::Result;
use crate::formatter::bson_utils::{BsonConverter, PlainTextConverter};
use crate::formatter::{Cell, Table};

use super::{SheetWriter, write_failed};

/// Writer for CSV format
#[derive(Default)]
pub struct CsvWriter {
    /// Converter for BSON to plain text
    converter: PlainTextConverter,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one row as a CSV line (without the line terminator)
    fn render_row<'a>(&self, values: impl Iterator<Item = &'a Cell>) -> String {
        values
            .map(|cell| Self::escape_csv_value(&self.converter.convert_optional(cell.value())))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Escape a CSV value if necessary
    fn escape_csv_value(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
        {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

#[async_trait]
impl SheetWriter for CsvWriter {
    async fn write_table(&self, table: &Table, path: &Path) -> Result<()> {
        let file = File::create(path).await.map_err(|e| write_failed(path, e))?;
        let mut writer = BufWriter::new(file);

        if !table.headers.is_empty() {
            let header_line = table
                .headers
                .iter()
                .map(|h| Self::escape_csv_value(h))
                .collect::<Vec<_>>()
                .join(",");
            writer
                .write_all(header_line.as_bytes())
                .await
                .map_err(|e| write_failed(path, e))?;
            writer.write_all(b"\n").await.map_err(|e| write_failed(path, e))?;
        }

        for row in &table.rows {
            let line = self.render_row(row.iter());
            writer
                .write_all(line.as_bytes())
                .await
                .map_err(|e| write_failed(path, e))?;
            writer.write_all(b"\n").await.map_err(|e| write_failed(path, e))?;
        }

        writer.flush().await.map_err(|e| write_failed(path, e))?;

        debug!(
            "Wrote CSV file {} ({} columns, {} rows)",
            path.display(),
            table.column_count(),
            table.row_count()
        );
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::project;
    use mongodb::bson::doc;
    use tokio::fs;

    fn temp_path(ext: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mongo-mcp-{}.{}", uuid::Uuid::new_v4(), ext))
    }

    #[tokio::test]
    async fn test_csv_writer_basic() {
        let path = temp_path("csv");
        let table = project(&[
            doc! { "name": "Alice", "age": 30 },
            doc! { "name": "Bob" },
        ]);

        CsvWriter::new().write_table(&table, &path).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "name,age\nAlice,30\nBob,\n");

        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_csv_writer_with_special_characters() {
        let path = temp_path("csv");
        let table = project(&[
            doc! { "text": "Hello, world!" },
            doc! { "text": "Quote: \"test\"" },
            doc! { "text": "Newline\ntest" },
        ]);

        CsvWriter::new().write_table(&table, &path).await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("\"Hello, world!\""));
        assert!(content.contains("\"Quote: \"\"test\"\"\""));
        assert!(content.contains("\"Newline\ntest\""));

        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_csv_writer_empty_table() {
        let path = temp_path("csv");
        CsvWriter::new()
            .write_table(&Table::default(), &path)
            .await
            .unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.is_empty());

        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_csv_writer_missing_directory() {
        let path = std::env::temp_dir()
            .join(format!("mongo-mcp-missing-{}", uuid::Uuid::new_v4()))
            .join("out.csv");
        let err = CsvWriter::new()
            .write_table(&Table::default(), &path)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to write file"));
    }

    #[test]
    fn test_csv_escape_value() {
        assert_eq!(CsvWriter::escape_csv_value("simple"), "simple");
        assert_eq!(CsvWriter::escape_csv_value("with,comma"), "\"with,comma\"");
        assert_eq!(CsvWriter::escape_csv_value("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(CsvWriter::escape_csv_value("with\nnewline"), "\"with\nnewline\"");
    }
}
