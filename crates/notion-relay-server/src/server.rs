//! Webhook HTTP entry point.
//!
//! Accepts `POST` with a JSON object body on any path and relays it into the
//! configured database. Any other method is rejected before anything else
//! happens. Responses are plain text.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use notion_relay_client::NotionClient;
use notion_relay_core::{Payload, RelayError, RelaySettings, RowCreated, relay};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Settings shared by every request. Nothing here changes after startup.
pub struct AppState {
    pub settings: RelaySettings,
    pub api_base: String,
    pub http: reqwest::Client,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(settings: RelaySettings, api_base: String) -> Self {
        Self {
            settings,
            api_base,
            http: reqwest::Client::new(),
        }
    }
}

/// Build the relay router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_webhook)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn handle_webhook(
    State(state): State<SharedState>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    }

    match relay_body(&state, &body).await {
        Ok(created) => {
            info!(status = created.status, "relay succeeded");
            (
                StatusCode::OK,
                format!("Success! Notion status {}", created.status),
            )
                .into_response()
        }
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            error!(status = status.as_u16(), error = %e, "relay failed");
            (status, e.to_string()).into_response()
        }
    }
}

async fn relay_body(state: &AppState, body: &[u8]) -> Result<RowCreated, RelayError> {
    let target = state.settings.require()?;
    let payload = Payload::from_slice(body)?;
    let client = NotionClient::with_http_client(
        state.http.clone(),
        state.api_base.clone(),
        target.notion_token,
    );
    relay(&client, &target.database_id, &payload).await
}
