//! Row assembly and submission.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::{RowCreated, TableClient};
use crate::error::{RelayError, RemoteError};
use crate::payload::Payload;
use crate::project::{PropertyValue, project_field};
use crate::schema::TableSchema;

/// A create-page request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingRow {
    pub parent: Parent,
    pub properties: BTreeMap<String, PropertyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parent {
    pub database_id: String,
}

impl OutgoingRow {
    /// Assemble a row from its title and already-projected fields.
    ///
    /// The title always wins over a projected field of the same name.
    pub fn new(
        database_id: impl Into<String>,
        title_column: &str,
        title: impl Into<String>,
        fields: BTreeMap<String, PropertyValue>,
    ) -> Self {
        let mut properties = fields;
        properties.insert(title_column.to_string(), PropertyValue::title(title));
        Self {
            parent: Parent {
                database_id: database_id.into(),
            },
            properties,
        }
    }
}

/// Title used when the payload carries no caller name.
pub fn fallback_title(now: DateTime<Utc>) -> String {
    format!(
        "Request from {}",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Project every payload field that has a column in `schema`.
///
/// Keys without a column are dropped, as is any key naming the title column:
/// the title only ever comes from the caller name.
pub fn project_fields(
    schema: &TableSchema,
    title_column: &str,
    payload: &Payload,
) -> BTreeMap<String, PropertyValue> {
    payload
        .column_fields()
        .filter(|(key, _)| *key != title_column)
        .filter_map(|(key, value)| {
            let column = schema.get(key)?;
            project_field(key, value, column).map(|v| (key.to_string(), v))
        })
        .collect()
}

/// Send the row. The remote answer comes back verbatim either way.
pub async fn submit_row(
    client: &dyn TableClient,
    row: &OutgoingRow,
) -> Result<RowCreated, RelayError> {
    if let Ok(body) = serde_json::to_string(row) {
        debug!(body = %body, "sending row to Notion");
    }

    match client.create_row(row).await {
        Ok(created) => {
            info!(status = created.status, "row created");
            debug!(body = %created.body, "Notion response body");
            Ok(created)
        }
        Err(RemoteError::Status { status, body }) => {
            warn!(status, body = %body, "row creation rejected");
            Err(RelayError::RowSubmission { status, body })
        }
        Err(e) => Err(RelayError::Unexpected(e.to_string())),
    }
}
