//! Query execution engine
//!
//! This module provides the execution layer behind the operation router:
//! - [`QueryExecutor`]: the seam to the document store (list, aggregate, scan)
//! - [`MongoExecutor`]: the production implementation over a shared [`Client`]
//! - [`export`]: spreadsheet sinks for exported tables
//! - [`pipeline`]: validation of caller-supplied aggregation pipelines
//! - [`router`]: operation dispatch and caller-facing error classification

pub mod export;
pub mod pipeline;
pub mod router;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, Document};
use mongodb::{Client, Collection};
use tracing::{debug, info, warn};

use crate::error::mongo::{describe_mongodb_error, extract_error_info};
use crate::error::{ExecutionError, Result};

pub use pipeline::Pipeline;
pub use router::{Operation, OperationRouter, Outcome};

/// Access to the underlying document store.
///
/// Every method fully materializes its result before returning. Database and
/// collection names are resolved as given; nothing is created on demand.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Collection descriptors of `database`, in server order.
    async fn list_collections(&self, database: &str) -> Result<Vec<Document>>;

    /// Run `pipeline` as a single aggregate against `database.collection`.
    async fn run(&self, database: &str, collection: &str, pipeline: &Pipeline)
    -> Result<Vec<Document>>;

    /// Unfiltered scan of `database.collection`.
    async fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Document>>;
}

/// [`QueryExecutor`] backed by the MongoDB driver.
///
/// Holds the single process-wide client. Cloning is cheap and shares the
/// same connection pool.
#[derive(Clone)]
pub struct MongoExecutor {
    client: Client,
}

impl MongoExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn collection(&self, database: &str, collection: &str) -> Collection<Document> {
        self.client.database(database).collection(collection)
    }
}

/// Wrap a driver failure as a query failure, logging the structured details
fn query_failed(error: mongodb::error::Error) -> ExecutionError {
    let info = extract_error_info(&error);
    warn!(
        "Query rejected by server: {}",
        info.to_json_compact().unwrap_or_default()
    );
    ExecutionError::QueryFailed(info.summary())
}

fn cursor_failed(error: mongodb::error::Error) -> ExecutionError {
    ExecutionError::CursorError(describe_mongodb_error(&error))
}

#[async_trait]
impl QueryExecutor for MongoExecutor {
    async fn list_collections(&self, database: &str) -> Result<Vec<Document>> {
        info!("Listing collections of database '{}'", database);

        let cursor = self
            .client
            .database(database)
            .list_collections()
            .await
            .map_err(query_failed)?;
        let specs: Vec<_> = cursor.try_collect().await.map_err(cursor_failed)?;

        let documents = specs
            .iter()
            .map(|spec| {
                bson::to_document(spec).map_err(|e| ExecutionError::Conversion(e.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Found {} collections", documents.len());
        Ok(documents)
    }

    async fn run(
        &self,
        database: &str,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>> {
        let stages = pipeline.to_documents()?;
        info!(
            "Executing aggregate on '{}.{}' with {} pipeline stages",
            database,
            collection,
            stages.len()
        );

        let cursor = self
            .collection(database, collection)
            .aggregate(stages)
            .await
            .map_err(query_failed)?;
        let documents: Vec<Document> = cursor.try_collect().await.map_err(cursor_failed)?;

        info!("Aggregation returned {} documents", documents.len());
        Ok(documents)
    }

    async fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Document>> {
        info!("Reading all documents of '{}.{}'", database, collection);

        let cursor = self
            .collection(database, collection)
            .find(bson::doc! {})
            .await
            .map_err(query_failed)?;
        let documents: Vec<Document> = cursor.try_collect().await.map_err(cursor_failed)?;

        debug!("Scan returned {} documents", documents.len());
        Ok(documents)
    }
}
