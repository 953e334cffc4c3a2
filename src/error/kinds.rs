use std::{fmt, io};

use serde::Serialize;

use crate::error::mongo::describe_mongodb_error;

/// Crate-wide `Result` type using [`McpServerError`] as the error.
pub type Result<T> = std::result::Result<T, McpServerError>;

/// Top-level internal error type.
///
/// Everything below the operation router speaks this type. The router and the
/// resource reader convert it into an [`OperationError`] before it reaches the
/// caller.
#[derive(Debug)]
pub enum McpServerError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Query execution errors.
    Execution(ExecutionError),

    /// Spreadsheet export errors.
    Export(ExportError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to build a client from the connection string.
    ConnectionFailed(String),

    /// Invalid connection URI.
    InvalidUri(String),

    /// Startup ping failed.
    PingFailed(String),
}

/// Execution-specific errors.
#[derive(Debug)]
pub enum ExecutionError {
    /// The engine rejected or failed the query.
    QueryFailed(String),

    /// Cursor iteration failed after the query started.
    CursorError(String),

    /// A pipeline stage could not be turned into a BSON document.
    InvalidStage { index: usize, reason: String },

    /// A result document could not be converted for the caller.
    Conversion(String),
}

/// Export (spreadsheet sink) errors.
#[derive(Debug)]
pub enum ExportError {
    /// Parent directory of the output target does not exist.
    DirectoryNotFound(String),

    /// The output target cannot be used as a file path.
    InvalidTarget(String),

    /// Writing or saving the file failed.
    WriteFailed(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Caller-facing taxonomy ========================= */

/// Error classification reported to the remote caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed or missing caller input.
    InvalidArgument,

    /// Locator does not resolve.
    NotFound,

    /// Operation name is not part of the catalog.
    MethodNotFound,

    /// Engine, sink or other internal failure.
    InternalError,
}

/// Structured error returned by the operation router and resource reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl OperationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MethodNotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Re-surface this error as an internal error, keeping the message.
    pub fn into_internal(self) -> Self {
        Self::internal(self.message)
    }
}

impl ErrorKind {
    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::MethodNotFound => "MethodNotFound",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for McpServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McpServerError::Connection(e) => write!(f, "Connection error: {e}"),
            McpServerError::Execution(e) => write!(f, "{e}"),
            McpServerError::Export(e) => write!(f, "Export error: {e}"),
            McpServerError::Config(e) => write!(f, "Configuration error: {e}"),
            McpServerError::Io(e) => write!(f, "I/O error: {e}"),
            McpServerError::MongoDb(e) => write!(f, "{}", describe_mongodb_error(e)),
            McpServerError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::InvalidUri(uri) => write!(f, "Invalid connection URI: {uri}"),
            ConnectionError::PingFailed(msg) => write!(f, "Ping failed: {msg}"),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            ExecutionError::CursorError(msg) => write!(f, "Cursor error: {msg}"),
            ExecutionError::InvalidStage { index, reason } => {
                write!(f, "Invalid pipeline stage at index {index}: {reason}")
            }
            ExecutionError::Conversion(msg) => write!(f, "Result conversion failed: {msg}"),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::DirectoryNotFound(dir) => write!(f, "Directory does not exist: {dir}"),
            ExportError::InvalidTarget(msg) => write!(f, "Invalid output target: {msg}"),
            ExportError::WriteFailed(msg) => write!(f, "Failed to write file: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for McpServerError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ExecutionError {}
impl std::error::Error for ExportError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for OperationError {}

/* ========================= Conversions ========================= */

impl From<io::Error> for McpServerError {
    fn from(err: io::Error) -> Self {
        McpServerError::Io(err)
    }
}

impl From<mongodb::error::Error> for McpServerError {
    fn from(err: mongodb::error::Error) -> Self {
        McpServerError::MongoDb(err)
    }
}

impl From<ConnectionError> for McpServerError {
    fn from(err: ConnectionError) -> Self {
        McpServerError::Connection(err)
    }
}

impl From<ExecutionError> for McpServerError {
    fn from(err: ExecutionError) -> Self {
        McpServerError::Execution(err)
    }
}

impl From<ExportError> for McpServerError {
    fn from(err: ExportError) -> Self {
        McpServerError::Export(err)
    }
}

impl From<ConfigError> for McpServerError {
    fn from(err: ConfigError) -> Self {
        McpServerError::Config(err)
    }
}

impl From<String> for McpServerError {
    fn from(msg: String) -> Self {
        McpServerError::Generic(msg)
    }
}

impl From<&str> for McpServerError {
    fn from(msg: &str) -> Self {
        McpServerError::Generic(msg.to_owned())
    }
}

/// Internal failures always surface as `InternalError`, message preserved.
impl From<McpServerError> for OperationError {
    fn from(err: McpServerError) -> Self {
        OperationError::internal(err.to_string())
    }
}
