//! Core of the Notion webhook relay: schema reconciliation and payload mapping.

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod identifier;
pub mod payload;
pub mod project;
pub mod reconcile;
pub mod relay;
pub mod row;
pub mod schema;

#[cfg(test)]
mod testing;

pub use client::{RowCreated, SchemaPatch, TableClient};
pub use config::{RelaySettings, RelayTarget};
pub use error::{RelayError, RemoteError};
pub use identifier::normalize_database_id;
pub use payload::{CALLER_NAME_KEY, Payload, PayloadValue};
pub use project::PropertyValue;
pub use relay::relay;
pub use row::OutgoingRow;
pub use schema::{ColumnType, TableSchema};
