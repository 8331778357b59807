//! The capability the core uses to talk to the remote database.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::row::OutgoingRow;
use crate::schema::{ColumnType, TableSchema};

/// Additive schema change: new column name → type to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaPatch {
    pub columns: Vec<(String, ColumnType)>,
}

impl SchemaPatch {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Successful row creation, as reported by the remote system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCreated {
    pub status: u16,
    pub body: String,
}

/// Remote table operations.
///
/// Implementations hold the credential. Each call is attempted exactly once;
/// a non-success response comes back as [`RemoteError::Status`] with the
/// upstream status and body untouched.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Read the column definitions of a database.
    async fn fetch_schema(&self, database_id: &str) -> Result<TableSchema, RemoteError>;

    /// Add columns to a database. Existing columns are left alone.
    async fn patch_schema(&self, database_id: &str, patch: &SchemaPatch) -> Result<(), RemoteError>;

    /// Create one row.
    async fn create_row(&self, row: &OutgoingRow) -> Result<RowCreated, RemoteError>;
}
