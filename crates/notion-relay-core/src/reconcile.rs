//! Schema reconciliation: make room in the database for unknown payload keys.
//!
//! Reconciliation is additive only. Keys the database doesn't know about get
//! a column whose type is inferred from the payload value; columns that
//! already exist are never retyped. A failed patch or refresh is logged and
//! the request carries on with the schema it already has, so known fields
//! are still written.

use tracing::{info, warn};

use crate::client::{SchemaPatch, TableClient};
use crate::payload::Payload;
use crate::schema::TableSchema;

/// Columns to create for payload keys missing from `schema`.
///
/// The caller-name key is never a column.
pub fn missing_columns(schema: &TableSchema, payload: &Payload) -> SchemaPatch {
    let columns = payload
        .column_fields()
        .filter(|(key, _)| !schema.contains(key))
        .map(|(key, value)| (key.to_string(), value.infer_column_type()))
        .collect();
    SchemaPatch { columns }
}

/// Extend the database schema to cover every payload key, best effort.
///
/// Returns the working schema to project against: unchanged when nothing is
/// missing or when the patch or refresh fails, otherwise merged with the
/// refreshed remote schema.
pub async fn reconcile(
    client: &dyn TableClient,
    database_id: &str,
    mut schema: TableSchema,
    payload: &Payload,
) -> TableSchema {
    let patch = missing_columns(&schema, payload);
    if patch.is_empty() {
        return schema;
    }

    info!(
        database_id,
        columns = ?patch.column_names(),
        "adding missing columns to database"
    );

    if let Err(e) = client.patch_schema(database_id, &patch).await {
        warn!(database_id, error = %e, "database update failed, continuing with known columns");
        return schema;
    }
    info!(database_id, added = patch.columns.len(), "added new columns to database");

    match client.fetch_schema(database_id).await {
        Ok(refreshed) => schema.merge(refreshed),
        Err(e) => {
            warn!(database_id, error = %e, "schema refresh failed, continuing with known columns");
        }
    }
    schema
}
