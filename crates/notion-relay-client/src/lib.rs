//! HTTP transport to the Notion API for the relay core.

pub mod http;

pub use http::{DEFAULT_API_BASE, NOTION_VERSION, NotionClient, NotionError};
