//! Spreadsheet export of query results
//!
//! The router hands a projected [`Table`] to a [`TableSink`] together with the
//! caller's output target. [`FileExporter`] is the filesystem sink:
//!
//! 1. The target is resolved to an absolute path. Relative paths are joined to
//!    the process working directory. An existing directory gets a generated
//!    `{collection}_{timestamp}.{ext}` file name.
//! 2. The output format is chosen from configuration, or from the extension
//!    when configured as `auto` (`.csv` selects CSV, anything else xlsx).
//! 3. The parent directory must exist unless `create_dirs` is enabled.
//! 4. The matching [`SheetWriter`] writes the file, replacing any existing one.

pub mod writers;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use tracing::{debug, info};

use crate::config::{ExportConfig, ExportFormat};
use crate::error::{ExportError, Result};
use crate::formatter::Table;

pub use writers::{CsvWriter, SheetWriter, XlsxWriter};

/// Destination for exported tables
#[async_trait]
pub trait TableSink: Send + Sync {
    /// Persist `table` at `target` and return the path actually written.
    ///
    /// `collection` names the source collection and is used when a file name
    /// has to be generated.
    async fn persist(&self, table: &Table, target: &str, collection: &str) -> Result<PathBuf>;
}

/// Filesystem sink writing xlsx or CSV files
pub struct FileExporter {
    config: ExportConfig,
}

impl FileExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Pick the writer for `path` according to the configured format
    fn writer_for(&self, path: &Path) -> Box<dyn SheetWriter> {
        let format = match self.config.format {
            ExportFormat::Auto if has_extension(path, "csv") => ExportFormat::Csv,
            ExportFormat::Auto => ExportFormat::Xlsx,
            fixed => fixed,
        };

        match format {
            ExportFormat::Csv => Box::new(CsvWriter::new()),
            _ => Box::new(XlsxWriter::new(self.config.sheet_name.clone())),
        }
    }

    /// Extension used for generated file names
    fn default_extension(&self) -> &'static str {
        match self.config.format {
            ExportFormat::Csv => "csv",
            _ => "xlsx",
        }
    }

    /// Resolve the caller's target to the file that will be written
    async fn resolve_target(&self, target: &str, collection: &str) -> Result<PathBuf> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ExportError::InvalidTarget("output path is empty".to_string()).into());
        }

        let mut path = PathBuf::from(target);
        if path.is_relative() {
            path = std::env::current_dir()?.join(path);
        }

        if tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            let file_name = generated_file_name(collection, self.default_extension());
            debug!("Output target is a directory, writing {}", file_name);
            path = path.join(file_name);
        }

        if path.file_name().is_none() {
            return Err(ExportError::InvalidTarget(format!(
                "no file name in '{}'",
                path.display()
            ))
            .into());
        }

        Ok(path)
    }

    /// Make sure the parent directory of `path` exists
    async fn prepare_parent(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };

        if tokio::fs::metadata(parent).await.is_ok_and(|m| m.is_dir()) {
            return Ok(());
        }

        if self.config.create_dirs {
            info!("Creating output directory {}", parent.display());
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ExportError::WriteFailed(format!("{}: {}", parent.display(), e))
            })?;
            Ok(())
        } else {
            Err(ExportError::DirectoryNotFound(parent.display().to_string()).into())
        }
    }
}

#[async_trait]
impl TableSink for FileExporter {
    async fn persist(&self, table: &Table, target: &str, collection: &str) -> Result<PathBuf> {
        let path = self.resolve_target(target, collection).await?;
        self.prepare_parent(&path).await?;

        let writer = self.writer_for(&path);
        info!(
            "Exporting {} rows to {} ({})",
            table.row_count(),
            path.display(),
            writer.extension()
        );
        writer.write_table(table, &path).await?;

        Ok(path)
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// File name for a directory target, e.g. `users_20240131_154500.xlsx`
fn generated_file_name(collection: &str, ext: &str) -> String {
    let stem: String = collection
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "export".to_string() } else { stem };
    format!("{}_{}.{}", stem, Local::now().format("%Y%m%d_%H%M%S"), ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::project;
    use mongodb::bson::doc;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mongo-mcp-export-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_table() -> Table {
        project(&[doc! { "name": "Alice", "age": 30 }, doc! { "name": "Bob" }])
    }

    #[tokio::test]
    async fn test_persist_xlsx() {
        let dir = scratch_dir();
        let target = dir.join("out.xlsx");
        let exporter = FileExporter::new(ExportConfig::default());

        let written = exporter
            .persist(&sample_table(), target.to_str().unwrap(), "users")
            .await
            .unwrap();

        assert_eq!(written, target);
        assert!(target.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_persist_xlsx_with_long_text() {
        let dir = scratch_dir();
        let target = dir.join("notes.xlsx");
        let exporter = FileExporter::new(ExportConfig::default());
        let table = project(&[doc! { "note": "x".repeat(40_000) }]);

        let written = exporter
            .persist(&table, target.to_str().unwrap(), "notes")
            .await
            .unwrap();

        assert!(written.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_persist_csv_by_extension() {
        let dir = scratch_dir();
        let target = dir.join("out.CSV");
        let exporter = FileExporter::new(ExportConfig::default());

        exporter
            .persist(&sample_table(), target.to_str().unwrap(), "users")
            .await
            .unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert_eq!(content, "name,age\nAlice,30\nBob,\n");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_persist_overwrites_existing_file() {
        let dir = scratch_dir();
        let target = dir.join("out.csv");
        std::fs::write(&target, "stale contents that are longer than the export").unwrap();

        let exporter = FileExporter::new(ExportConfig::default());
        exporter
            .persist(&sample_table(), target.to_str().unwrap(), "users")
            .await
            .unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert!(content.starts_with("name,age"));
        assert!(!content.contains("stale"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_parent_directory() {
        let dir = scratch_dir();
        let target = dir.join("missing").join("out.xlsx");
        let exporter = FileExporter::new(ExportConfig::default());

        let err = exporter
            .persist(&sample_table(), target.to_str().unwrap(), "users")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Directory does not exist"));
        assert!(!target.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_create_missing_parent_directory() {
        let dir = scratch_dir();
        let target = dir.join("nested").join("deeper").join("out.csv");
        let exporter = FileExporter::new(ExportConfig {
            create_dirs: true,
            ..ExportConfig::default()
        });

        exporter
            .persist(&sample_table(), target.to_str().unwrap(), "users")
            .await
            .unwrap();

        assert!(target.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_directory_target_generates_file_name() {
        let dir = scratch_dir();
        let exporter = FileExporter::new(ExportConfig::default());

        let written = exporter
            .persist(&sample_table(), dir.to_str().unwrap(), "users")
            .await
            .unwrap();

        assert_eq!(written.parent().unwrap(), dir.as_path());
        let name = written.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("users_"));
        assert!(name.ends_with(".xlsx"));
        assert!(written.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_empty_target_rejected() {
        let exporter = FileExporter::new(ExportConfig::default());
        let err = exporter
            .persist(&sample_table(), "   ", "users")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid output target"));
    }

    #[tokio::test]
    async fn test_configured_csv_format_ignores_extension() {
        let dir = scratch_dir();
        let target = dir.join("out.xlsx");
        let exporter = FileExporter::new(ExportConfig {
            format: ExportFormat::Csv,
            ..ExportConfig::default()
        });

        exporter
            .persist(&sample_table(), target.to_str().unwrap(), "users")
            .await
            .unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert!(content.starts_with("name,age"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_generated_file_name_sanitizes_collection() {
        let name = generated_file_name("logs/2024 q1", "csv");
        assert!(name.starts_with("logs_2024_q1_"));
        assert!(name.ends_with(".csv"));
    }
}
