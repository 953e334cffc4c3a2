//! Aggregation pipeline validation
//!
//! The validator only checks that the caller sent an ordered sequence. Stage
//! contents are opaque here: they are converted to BSON right before
//! execution, and anything the engine dislikes surfaces as an execution
//! failure.

use mongodb::bson::{Bson, Document};
use serde_json::Value;

use crate::error::{ExecutionError, OperationError};

/// Validated, order-preserving sequence of pipeline stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Value>,
}

/// Accept `value` only if it is an array; elements pass through unexamined.
pub fn validate(value: Value) -> Result<Pipeline, OperationError> {
    match value {
        Value::Array(stages) => Ok(Pipeline { stages }),
        _ => Err(OperationError::invalid_argument("pipeline must be an array")),
    }
}

impl Pipeline {
    /// The empty pipeline: return every document unmodified.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> &[Value] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Convert each stage to a BSON document for the driver.
    ///
    /// Object stages are read as extended JSON, so `{"$oid": ...}` and
    /// `{"$date": ...}` values keep their BSON types. A string stage is
    /// decoded as JSON text first.
    pub fn to_documents(&self) -> Result<Vec<Document>, ExecutionError> {
        self.stages
            .iter()
            .enumerate()
            .map(|(index, stage)| stage_to_document(index, stage))
            .collect()
    }
}

fn stage_to_document(index: usize, stage: &Value) -> Result<Document, ExecutionError> {
    let invalid = |reason: String| ExecutionError::InvalidStage { index, reason };

    let object = match stage {
        Value::Object(_) => stage.clone(),
        Value::String(text) => {
            let decoded: Value = serde_json::from_str(text)
                .map_err(|e| invalid(format!("stage string is not valid JSON: {e}")))?;
            if !decoded.is_object() {
                return Err(invalid(format!(
                    "expected a stage object, found {}",
                    json_type_name(&decoded)
                )));
            }
            decoded
        }
        other => {
            return Err(invalid(format!(
                "expected a stage object, found {}",
                json_type_name(other)
            )));
        }
    };

    match Bson::try_from(object) {
        Ok(Bson::Document(doc)) => Ok(doc),
        Ok(other) => Err(invalid(format!(
            "extended JSON stage decoded to {:?}, not a document",
            other.element_type()
        ))),
        Err(e) => Err(invalid(e.to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
