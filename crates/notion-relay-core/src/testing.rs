//! Scripted [`TableClient`] that records every call.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{RowCreated, SchemaPatch, TableClient};
use crate::error::RemoteError;
use crate::row::OutgoingRow;
use crate::schema::TableSchema;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchSchema(String),
    PatchSchema(String, SchemaPatch),
    CreateRow(OutgoingRow),
}

/// Schema fetches are answered in order; the last scripted answer repeats.
pub struct RecordingClient {
    fetches: Mutex<VecDeque<Result<TableSchema, RemoteError>>>,
    patch: Result<(), RemoteError>,
    create: Result<RowCreated, RemoteError>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingClient {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            fetches: Mutex::new(VecDeque::from([Ok(schema)])),
            patch: Ok(()),
            create: Ok(RowCreated {
                status: 200,
                body: r#"{"object":"page"}"#.to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer for the next schema fetch after the ones already scripted.
    pub fn then_schema(self, schema: TableSchema) -> Self {
        self.fetches.lock().unwrap().push_back(Ok(schema));
        self
    }

    pub fn then_fetch_fails(self, err: RemoteError) -> Self {
        self.fetches.lock().unwrap().push_back(Err(err));
        self
    }

    /// Make the very first schema fetch fail.
    pub fn fail_fetch(self, err: RemoteError) -> Self {
        *self.fetches.lock().unwrap() = VecDeque::from([Err(err)]);
        self
    }

    pub fn fail_patch(mut self, err: RemoteError) -> Self {
        self.patch = Err(err);
        self
    }

    pub fn fail_create(mut self, err: RemoteError) -> Self {
        self.create = Err(err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn patches(&self) -> Vec<SchemaPatch> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PatchSchema(_, patch) => Some(patch),
                _ => None,
            })
            .collect()
    }

    pub fn created_rows(&self) -> Vec<OutgoingRow> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateRow(row) => Some(row),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TableClient for RecordingClient {
    async fn fetch_schema(&self, database_id: &str) -> Result<TableSchema, RemoteError> {
        self.record(Call::FetchSchema(database_id.to_string()));
        let mut fetches = self.fetches.lock().unwrap();
        if fetches.len() > 1 {
            fetches.pop_front().unwrap()
        } else {
            fetches.front().cloned().unwrap()
        }
    }

    async fn patch_schema(
        &self,
        database_id: &str,
        patch: &SchemaPatch,
    ) -> Result<(), RemoteError> {
        self.record(Call::PatchSchema(database_id.to_string(), patch.clone()));
        self.patch.clone()
    }

    async fn create_row(&self, row: &OutgoingRow) -> Result<RowCreated, RemoteError> {
        self.record(Call::CreateRow(row.clone()));
        self.create.clone()
    }
}
