//! Error handling for the MCP server.
//!
//! Two layers of errors live here:
//! - Internal errors ([`McpServerError`] and its kinds) raised by the
//!   connection, executor, export and configuration code
//! - Caller-facing errors ([`OperationError`] tagged with an [`ErrorKind`])
//!   produced at the operation router and resource reader boundary
//!
//! MongoDB driver failures are summarized through [`mongo::extract_error_info`]
//! so that callers see a stable `Name (code): message` string.
//!
//! # Example
//!
//! ```rust
//! use mongo_mcp::error::{ErrorKind, OperationError};
//!
//! let err = OperationError::invalid_argument("missing field `database`");
//! assert_eq!(err.kind, ErrorKind::InvalidArgument);
//! ```

pub mod kinds;
pub mod mongo;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ConnectionError, ErrorKind, ExecutionError, ExportError, McpServerError,
    OperationError, Result,
};
pub use mongo::{ErrorInfo, extract_error_info};
