use serde::{Deserialize, Serialize};

/// Structured error information extracted from MongoDB errors.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

impl ErrorInfo {
    /// Convert error info to compact JSON string (single line).
    pub fn to_json_compact(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// One-line summary: `Name (code): message`, degrading gracefully when
    /// the driver did not report a name or code.
    pub fn summary(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown MongoDB error");
        match (&self.name, self.code) {
            (Some(name), Some(code)) => format!("{name} ({code}): {message}"),
            (None, Some(code)) => format!("MongoDB error {code}: {message}"),
            (Some(name), None) => format!("{name}: {message}"),
            (None, None) => message.to_string(),
        }
    }
}

/// Summarize a driver error for callers and logs.
pub fn describe_mongodb_error(error: &mongodb::error::Error) -> String {
    extract_error_info(error).summary()
}

/// Extract structured information from a MongoDB error using the driver API.
///
/// Only the read-side error kinds this server can run into are unpacked;
/// everything else falls back to the driver's `Display` output.
pub fn extract_error_info(error: &mongodb::error::Error) -> ErrorInfo {
    use mongodb::error::ErrorKind;

    let mut info = ErrorInfo::default();

    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => {
            info.error_type = Some("mongo.command_error".to_string());
            info.code = Some(command_error.code);
            info.message = Some(command_error.message.clone());
            info.name = if command_error.code_name.is_empty() {
                get_error_name(command_error.code)
            } else {
                Some(command_error.code_name.clone())
            };
        }
        ErrorKind::Authentication { message, .. } => {
            info.error_type = Some("mongo.authentication_error".to_string());
            info.name = Some("AuthenticationFailed".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::InvalidArgument { message, .. } => {
            info.error_type = Some("mongo.invalid_argument".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::ServerSelection { message, .. } => {
            info.error_type = Some("mongo.server_selection_error".to_string());
            info.name = Some("ServerSelectionTimeout".to_string());
            info.message = Some(message.clone());
        }
        _ => {
            info.message = Some(error.to_string());
        }
    }

    info
}

/// Get a human-readable error name from a MongoDB error code.
fn get_error_name(code: i32) -> Option<String> {
    let name = match code {
        2 => "BadValue",
        13 => "Unauthorized",
        14 => "TypeMismatch",
        18 => "AuthenticationFailed",
        26 => "NamespaceNotFound",
        40324 => "UnrecognizedPipelineStage",
        50 => "MaxTimeMSExpired",
        _ => return None,
    };

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names() {
        assert_eq!(get_error_name(26).as_deref(), Some("NamespaceNotFound"));
        assert_eq!(get_error_name(40324).as_deref(), Some("UnrecognizedPipelineStage"));
        assert_eq!(get_error_name(99999), None);
    }

    #[test]
    fn test_summary_variants() {
        let full = ErrorInfo {
            error_type: Some("mongo.command_error".into()),
            code: Some(40324),
            name: Some("Location40324".into()),
            message: Some("Unrecognized pipeline stage name: '$bogus'".into()),
        };
        assert_eq!(
            full.summary(),
            "Location40324 (40324): Unrecognized pipeline stage name: '$bogus'"
        );

        let code_only = ErrorInfo {
            code: Some(14),
            message: Some("bad type".into()),
            ..Default::default()
        };
        assert_eq!(code_only.summary(), "MongoDB error 14: bad type");

        assert_eq!(ErrorInfo::default().summary(), "unknown MongoDB error");
    }

    #[test]
    fn test_json_skips_missing_fields() {
        let info = ErrorInfo {
            message: Some("boom".into()),
            ..Default::default()
        };
        assert_eq!(info.to_json_compact().unwrap(), r#"{"message":"boom"}"#);
    }
}
