//! MongoDB MCP Server Library
//!
//! This library provides the building blocks of the `mongo-mcp` server: a
//! Model Context Protocol endpoint that lists collections, runs aggregation
//! pipelines, exports results to spreadsheets and serves whole collections as
//! resources.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `connection`: MongoDB client setup
//! - `error`: Error types and caller-facing error taxonomy
//! - `executor`: Pipeline validation, query execution, operation routing, export
//! - `formatter`: JSON output and tabular projection
//! - `resource`: Collection resources addressed by locator
//! - `server`: MCP handler over stdio
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mongo_mcp::{config::Config, connection::ConnectionManager};
//! use mongo_mcp::executor::{MongoExecutor, OperationRouter, export::FileExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = ConnectionManager::new(config.connection.clone()).connect().await?;
//!
//!     let router = OperationRouter::new(
//!         Arc::new(MongoExecutor::new(client)),
//!         Arc::new(FileExporter::new(config.export.clone())),
//!     );
//!     let outcome = router.route("query", serde_json::json!({
//!         "database": "shop",
//!         "collection": "orders",
//!         "pipeline": [{ "$limit": 5 }]
//!     }).as_object()).await?;
//!     println!("{}", outcome.text());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod resource;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use connection::ConnectionManager;
pub use error::{McpServerError, OperationError, Result};
pub use executor::{MongoExecutor, OperationRouter, Outcome, QueryExecutor};
pub use resource::ResourceReader;
pub use server::MongoMcpServer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
