//! HTTP client for the Notion databases and pages endpoints.

use std::collections::BTreeMap;

use async_trait::async_trait;
use notion_relay_core::{
    ColumnType, OutgoingRow, RemoteError, RowCreated, SchemaPatch, TableClient, TableSchema,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";

/// Value of the `Notion-Version` header sent on every request.
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Error, Debug)]
pub enum NotionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<NotionError> for RemoteError {
    fn from(err: NotionError) -> Self {
        match err {
            NotionError::Server { status, body } => RemoteError::Status { status, body },
            NotionError::Http(e) => RemoteError::Transport(e.to_string()),
            NotionError::Json(e) => RemoteError::Decode(e.to_string()),
        }
    }
}

/// Notion API client bound to one integration token.
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct DatabaseResponse {
    properties: BTreeMap<String, PropertyMeta>,
}

#[derive(Deserialize)]
struct PropertyMeta {
    #[serde(rename = "type")]
    kind: String,
}

impl NotionClient {
    /// Create a client for the given API base URL.
    ///
    /// `base_url` should be like `https://api.notion.com/v1` (no trailing slash).
    pub fn new(base_url: String, token: String) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, token)
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_http_client(client: reqwest::Client, base_url: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn database_url(&self, database_id: &str) -> String {
        format!("{}/databases/{}", self.base_url, database_id)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    /// Retrieve a database and return its column definitions.
    pub async fn get_database(&self, database_id: &str) -> Result<TableSchema, NotionError> {
        let url = self.database_url(database_id);
        info!(url = %url, "retrieving database schema");
        let body = send(self.request(reqwest::Method::GET, &url)).await?;
        let db: DatabaseResponse = serde_json::from_str(&body)?;
        Ok(db
            .properties
            .into_iter()
            .map(|(name, meta)| (name, ColumnType::from_notion(&meta.kind)))
            .collect())
    }

    /// Add the patch's columns to a database.
    pub async fn update_database(
        &self,
        database_id: &str,
        patch: &SchemaPatch,
    ) -> Result<(), NotionError> {
        let url = self.database_url(database_id);
        info!(url = %url, columns = patch.columns.len(), "updating database schema");
        send(
            self.request(reqwest::Method::PATCH, &url)
                .json(&patch_body(patch)),
        )
        .await?;
        Ok(())
    }

    /// Create a page (row) in the row's parent database.
    pub async fn create_page(&self, row: &OutgoingRow) -> Result<RowCreated, NotionError> {
        let url = format!("{}/pages", self.base_url);
        info!(url = %url, properties = row.properties.len(), "creating page");
        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(row)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotionError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;
        Ok(RowCreated {
            status: status.as_u16(),
            body,
        })
    }
}

/// Send a request and return the body of a successful response.
async fn send(request: reqwest::RequestBuilder) -> Result<String, NotionError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(NotionError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.text().await?)
}

/// `{"properties": {"<name>": {"<type>": {}}}}`
fn patch_body(patch: &SchemaPatch) -> Value {
    let properties: Map<String, Value> = patch
        .columns
        .iter()
        .map(|(name, ty)| {
            let mut config = Map::new();
            config.insert(ty.notion_name().to_string(), json!({}));
            (name.clone(), Value::Object(config))
        })
        .collect();
    json!({ "properties": properties })
}

#[async_trait]
impl TableClient for NotionClient {
    async fn fetch_schema(&self, database_id: &str) -> Result<TableSchema, RemoteError> {
        Ok(self.get_database(database_id).await?)
    }

    async fn patch_schema(
        &self,
        database_id: &str,
        patch: &SchemaPatch,
    ) -> Result<(), RemoteError> {
        Ok(self.update_database(database_id, patch).await?)
    }

    async fn create_row(&self, row: &OutgoingRow) -> Result<RowCreated, RemoteError> {
        Ok(self.create_page(row).await?)
    }
}
