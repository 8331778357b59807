//! One relay request, end to end.
//!
//! normalise id → fetch schema → reconcile → project → submit. Every remote
//! call happens at most once and strictly in that order.

use chrono::Utc;
use tracing::{debug, info};

use crate::client::{RowCreated, TableClient};
use crate::error::RelayError;
use crate::fetch::fetch_schema;
use crate::identifier::normalize_database_id;
use crate::payload::Payload;
use crate::reconcile::reconcile;
use crate::row::{OutgoingRow, fallback_title, project_fields, submit_row};

/// Relay `payload` into the database identified by `raw_database_id`.
pub async fn relay(
    client: &dyn TableClient,
    raw_database_id: &str,
    payload: &Payload,
) -> Result<RowCreated, RelayError> {
    let database_id = normalize_database_id(raw_database_id);
    info!(database_id = %database_id, fields = payload.len(), "relaying payload");
    debug!(payload = ?payload, "received payload");

    let resolved = fetch_schema(client, &database_id).await?;
    let schema = reconcile(client, &database_id, resolved.schema, payload).await;

    let title = payload
        .caller_name()
        .unwrap_or_else(|| fallback_title(Utc::now()));
    let fields = project_fields(&schema, &resolved.title_column, payload);
    let row = OutgoingRow::new(database_id, &resolved.title_column, title, fields);

    submit_row(client, &row).await
}
