//! Schema retrieval for the target database.

use tracing::{info, warn};

use crate::client::TableClient;
use crate::error::{RelayError, RemoteError};
use crate::schema::TableSchema;

/// A fetched schema together with its title column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub schema: TableSchema,
    pub title_column: String,
}

/// Read the database schema and locate its title column.
///
/// Any failure here is fatal for the request.
pub async fn fetch_schema(
    client: &dyn TableClient,
    database_id: &str,
) -> Result<ResolvedSchema, RelayError> {
    let schema = client.fetch_schema(database_id).await.map_err(|e| {
        warn!(database_id, error = %e, "database schema fetch failed");
        schema_read_error(e)
    })?;

    info!(
        database_id,
        columns = ?schema.column_names().collect::<Vec<_>>(),
        "fetched database schema"
    );

    let title_column = schema
        .title_column()
        .ok_or(RelayError::MissingTitleColumn)?
        .to_string();
    info!(title_column = %title_column, "found title column");

    Ok(ResolvedSchema {
        schema,
        title_column,
    })
}

fn schema_read_error(err: RemoteError) -> RelayError {
    match err {
        RemoteError::Status { status, body } => RelayError::SchemaRead { status, body },
        other => RelayError::Unexpected(other.to_string()),
    }
}
