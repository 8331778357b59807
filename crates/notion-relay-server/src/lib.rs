//! HTTP entry point and configuration checks for the Notion webhook relay.

pub mod server;
pub mod validate;

pub use server::{AppState, router};
