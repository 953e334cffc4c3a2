//! In-memory [`QueryExecutor`] for unit tests.
//!
//! Understands just enough of the aggregation language for router tests:
//! `$match` on top-level equality, `$limit` and `$project` inclusion. Any
//! other stage name fails the way the server would.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, doc};

use super::{Pipeline, QueryExecutor};
use crate::error::{ExecutionError, Result};

#[derive(Default)]
pub(crate) struct MemoryExecutor {
    databases: BTreeMap<String, BTreeMap<String, Vec<Document>>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_collection(
        mut self,
        database: &str,
        collection: &str,
        documents: Vec<Document>,
    ) -> Self {
        self.databases
            .entry(database.to_string())
            .or_default()
            .insert(collection.to_string(), documents);
        self
    }

    /// Names of the executor methods invoked so far
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }

    fn documents(&self, database: &str, collection: &str) -> Vec<Document> {
        self.databases
            .get(database)
            .and_then(|db| db.get(collection))
            .cloned()
            .unwrap_or_default()
    }
}

fn apply_stage(docs: Vec<Document>, stage: &Document) -> Result<Vec<Document>> {
    let Some((name, spec)) = stage.iter().next() else {
        return Err(ExecutionError::QueryFailed("empty stage".into()).into());
    };

    match (name.as_str(), spec) {
        ("$match", Bson::Document(filter)) => Ok(docs
            .into_iter()
            .filter(|d| filter.iter().all(|(k, v)| d.get(k) == Some(v)))
            .collect()),
        ("$limit", Bson::Int32(n)) => Ok(docs.into_iter().take(*n as usize).collect()),
        ("$project", Bson::Document(fields)) => Ok(docs
            .into_iter()
            .map(|d| {
                d.into_iter()
                    .filter(|(k, _)| fields.contains_key(k))
                    .collect::<Document>()
            })
            .collect()),
        _ => Err(ExecutionError::QueryFailed(format!(
            "Unrecognized pipeline stage name: '{name}'"
        ))
        .into()),
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn list_collections(&self, database: &str) -> Result<Vec<Document>> {
        self.record("list_collections");
        Ok(self
            .databases
            .get(database)
            .map(|db| {
                db.keys()
                    .map(|name| doc! { "name": name, "type": "collection" })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn run(
        &self,
        database: &str,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>> {
        self.record("run");
        let stages = pipeline.to_documents()?;
        stages
            .iter()
            .try_fold(self.documents(database, collection), apply_stage)
    }

    async fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Document>> {
        self.record("find_all");
        Ok(self.documents(database, collection))
    }
}
