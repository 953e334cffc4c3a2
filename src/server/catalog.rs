//! Tool catalog advertised through `tools/list`
//!
//! Input schemas are plain JSON Schema objects. Pipeline stages are declared
//! as objects or JSON-encoded strings, both of which the executor accepts.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};

fn schema(value: Value) -> Arc<JsonObject> {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

fn pipeline_property() -> Value {
    json!({
        "type": "array",
        "description": "Aggregation pipeline stages, as objects or JSON-encoded strings",
        "items": { "type": ["object", "string"] }
    })
}

/// All operations, in catalog order
pub fn tools() -> Vec<Tool> {
    vec![
        Tool::new(
            "list_collections",
            "List the collections of a MongoDB database",
            schema(json!({
                "type": "object",
                "properties": {
                    "database": { "type": "string", "description": "Database name" }
                },
                "required": ["database"]
            })),
        ),
        Tool::new(
            "query",
            "Run an aggregation pipeline against a collection and return the results as JSON",
            schema(json!({
                "type": "object",
                "properties": {
                    "database": { "type": "string", "description": "Database name" },
                    "collection": { "type": "string", "description": "Collection the pipeline starts from" },
                    "pipeline": pipeline_property()
                },
                "required": ["database", "collection"]
            })),
        ),
        Tool::new(
            "export",
            "Run an aggregation pipeline and write the results to a spreadsheet file (xlsx or csv)",
            schema(json!({
                "type": "object",
                "properties": {
                    "database": { "type": "string", "description": "Database name" },
                    "collection": { "type": "string", "description": "Collection the pipeline starts from" },
                    "outputPath": {
                        "type": "string",
                        "description": "Output file, or an existing directory to generate a file name in"
                    },
                    "pipeline": pipeline_property()
                },
                "required": ["database", "collection", "outputPath"]
            })),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Operation;

    #[test]
    fn test_catalog_matches_operations() {
        let names: Vec<String> = tools().iter().map(|t| t.name.to_string()).collect();
        assert_eq!(names, Operation::NAMES);
    }

    #[test]
    fn test_required_fields() {
        let tools = tools();
        let export = tools.iter().find(|t| t.name == "export").unwrap();
        assert_eq!(
            export.input_schema.get("required"),
            Some(&json!(["database", "collection", "outputPath"]))
        );
    }
}
