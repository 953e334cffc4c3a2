//! Resource reads of whole collections
//!
//! A resource locator has the form `<scheme>://<database>/<collection>`. The
//! scheme must be present but carries no meaning. Reading a resource returns
//! every document of the collection as pretty-printed JSON.

use std::fmt;
use std::sync::Arc;

use mongodb::bson::Document;
use tracing::{info, warn};

use crate::error::OperationError;
use crate::executor::QueryExecutor;
use crate::formatter::JsonFormatter;

/// MIME type of resource contents
pub const MIME_TYPE: &str = "application/json";

/// Locator template advertised to clients
pub const URI_TEMPLATE: &str = "mongodb://{database}/{collection}";

/// Parsed `<scheme>://<database>/<collection>` locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    pub scheme: String,
    pub database: String,
    pub collection: String,
}

impl ResourceLocator {
    /// Parse a locator, rejecting anything that does not name exactly one
    /// database and one collection. A single trailing slash is tolerated.
    pub fn parse(uri: &str) -> Result<Self, OperationError> {
        let not_found = || OperationError::not_found(format!("Resource not found: {uri}"));

        let (scheme, rest) = uri.split_once("://").ok_or_else(not_found)?;
        if scheme.is_empty() {
            return Err(not_found());
        }

        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let mut segments = rest.split('/');
        let (Some(database), Some(collection), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(not_found());
        };
        if database.is_empty() || collection.is_empty() {
            return Err(not_found());
        }

        Ok(Self {
            scheme: scheme.to_string(),
            database: database.to_string(),
            collection: collection.to_string(),
        })
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.database, self.collection)
    }
}

/// Reads collection resources through the shared executor
pub struct ResourceReader {
    executor: Arc<dyn QueryExecutor>,
    formatter: JsonFormatter,
}

impl ResourceReader {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            formatter: JsonFormatter::default(),
        }
    }

    /// All documents of the collection named by `uri`
    pub async fn read(&self, uri: &str) -> Result<Vec<Document>, OperationError> {
        let locator = ResourceLocator::parse(uri).inspect_err(|_| {
            warn!("Rejected resource locator '{}'", uri);
        })?;

        info!("Reading resource {}", locator);
        let documents = self
            .executor
            .find_all(&locator.database, &locator.collection)
            .await?;
        Ok(documents)
    }

    /// Resource contents as JSON text
    pub async fn read_text(&self, uri: &str) -> Result<String, OperationError> {
        let documents = self.read(uri).await?;
        Ok(self.formatter.format_documents(&documents)?)
    }
}
