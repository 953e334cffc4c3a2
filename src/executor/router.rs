//! Operation router for dispatching tool calls to the executor
//!
//! This module maps an operation name plus its argument object to one of the
//! three operations and runs it:
//! - `list_collections` → collection descriptors as JSON
//! - `query` → aggregate results as JSON
//! - `export` → aggregate results projected to a table and written by a sink
//!
//! Every failure leaves the router as an [`OperationError`]. Argument problems
//! are `InvalidArgument`, unknown names are `MethodNotFound`, and anything the
//! pipeline validator, executor or sink reports becomes `InternalError` with
//! the original message.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::OperationError;
use crate::formatter::{JsonFormatter, project};

use super::QueryExecutor;
use super::export::TableSink;
use super::pipeline::{self, Pipeline};

/// Arguments of `list_collections`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListCollectionsArgs {
    pub database: String,
}

/// Arguments of `query`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryArgs {
    pub database: String,
    pub collection: String,
    #[serde(default, deserialize_with = "present")]
    pub pipeline: Option<Value>,
}

/// Arguments of `export`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportArgs {
    pub database: String,
    pub collection: String,
    #[serde(rename = "outputPath")]
    pub output_path: String,
    #[serde(default, deserialize_with = "present")]
    pub pipeline: Option<Value>,
}

/// Keep an explicit `null` as `Some(Value::Null)` so only an omitted field
/// means "no pipeline".
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A parsed operation request
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    ListCollections(ListCollectionsArgs),
    Query(QueryArgs),
    Export(ExportArgs),
}

impl Operation {
    /// Canonical operation names, in catalog order
    pub const NAMES: [&'static str; 3] = ["list_collections", "query", "export"];

    /// Resolve an operation name or one of its legacy aliases
    pub fn canonical_name(name: &str) -> Option<&'static str> {
        match name {
            "list_collections" | "get_collections" => Some("list_collections"),
            "query" | "multi_collection_query" => Some("query"),
            "export" | "export_to_excel" => Some("export"),
            _ => None,
        }
    }

    /// Parse an operation from its name and argument object
    ///
    /// The name is checked first, so an unknown name is `MethodNotFound`
    /// whatever the arguments look like.
    pub fn parse(name: &str, arguments: Option<&Map<String, Value>>) -> Result<Self, OperationError> {
        let Some(canonical) = Self::canonical_name(name) else {
            return Err(OperationError::method_not_found(format!("Unknown tool: {name}")));
        };

        let Some(arguments) = arguments else {
            return Err(OperationError::invalid_argument("Missing arguments in request"));
        };

        match canonical {
            "list_collections" => decode(canonical, arguments).map(Operation::ListCollections),
            "query" => decode(canonical, arguments).map(Operation::Query),
            _ => decode(canonical, arguments).map(Operation::Export),
        }
    }

    /// Canonical name of this operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListCollections(_) => "list_collections",
            Operation::Query(_) => "query",
            Operation::Export(_) => "export",
        }
    }
}

fn decode<T: DeserializeOwned>(
    operation: &str,
    arguments: &Map<String, Value>,
) -> Result<T, OperationError> {
    serde_json::from_value(Value::Object(arguments.clone())).map_err(|e| {
        OperationError::invalid_argument(format!("Invalid arguments for {operation}: {e}"))
    })
}

/// Successful result of an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// JSON text payload
    Json(String),

    /// A file was written by the export sink
    FileWritten { path: PathBuf, rows: usize },
}

impl Outcome {
    /// Text returned to the caller
    pub fn text(&self) -> String {
        match self {
            Outcome::Json(text) => text.clone(),
            Outcome::FileWritten { path, rows } => {
                format!("Exported {} rows to {}", rows, path.display())
            }
        }
    }
}

/// Operation router that dispatches operations to the executor and sink
pub struct OperationRouter {
    executor: Arc<dyn QueryExecutor>,
    sink: Arc<dyn TableSink>,
    formatter: JsonFormatter,
}

impl OperationRouter {
    /// Create a new router
    ///
    /// # Arguments
    /// * `executor` - Document store access shared by all requests
    /// * `sink` - Destination for exported tables
    pub fn new(executor: Arc<dyn QueryExecutor>, sink: Arc<dyn TableSink>) -> Self {
        Self {
            executor,
            sink,
            formatter: JsonFormatter::default(),
        }
    }

    /// Parse and execute a named operation
    pub async fn route(
        &self,
        name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<Outcome, OperationError> {
        let operation = Operation::parse(name, arguments).inspect_err(|e| {
            warn!("Rejected call to '{}': {}", name, e);
        })?;
        self.execute(operation).await
    }

    /// Execute an already parsed operation
    pub async fn execute(&self, operation: Operation) -> Result<Outcome, OperationError> {
        let name = operation.name();
        info!("Executing operation '{}'", name);
        let start = Instant::now();

        let result = match operation {
            Operation::ListCollections(args) => self.list_collections(args).await,
            Operation::Query(args) => self.query(args).await,
            Operation::Export(args) => self.export(args).await,
        };

        let elapsed = start.elapsed().as_millis();
        match &result {
            Ok(_) => debug!("Operation '{}' finished in {}ms", name, elapsed),
            Err(e) => warn!("Operation '{}' failed after {}ms: {}", name, elapsed, e),
        }
        result
    }

    async fn list_collections(&self, args: ListCollectionsArgs) -> Result<Outcome, OperationError> {
        let collections = self.executor.list_collections(&args.database).await?;
        Ok(Outcome::Json(self.formatter.format_documents(&collections)?))
    }

    async fn query(&self, args: QueryArgs) -> Result<Outcome, OperationError> {
        let pipeline = resolve_pipeline(args.pipeline)?;
        let documents = self
            .executor
            .run(&args.database, &args.collection, &pipeline)
            .await?;
        Ok(Outcome::Json(self.formatter.format_documents(&documents)?))
    }

    async fn export(&self, args: ExportArgs) -> Result<Outcome, OperationError> {
        let pipeline = resolve_pipeline(args.pipeline)?;
        let documents = self
            .executor
            .run(&args.database, &args.collection, &pipeline)
            .await?;

        let table = project(&documents);
        debug!(
            "Projected {} records to {} columns",
            table.row_count(),
            table.column_count()
        );

        let path = self
            .sink
            .persist(&table, &args.output_path, &args.collection)
            .await?;

        Ok(Outcome::FileWritten {
            path,
            rows: table.row_count(),
        })
    }
}

/// Omitted pipeline is the empty pipeline; validator failures are internal
fn resolve_pipeline(pipeline: Option<Value>) -> Result<Pipeline, OperationError> {
    match pipeline {
        None => Ok(Pipeline::empty()),
        Some(value) => pipeline::validate(value).map_err(OperationError::into_internal),
    }
}
