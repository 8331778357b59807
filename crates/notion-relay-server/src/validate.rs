//! Pre-deployment configuration check for the relay.
//!
//! Errors make the relay unusable; warnings flag values that are probably
//! wrong but might still work.

use notion_relay_core::RelaySettings;
use notion_relay_core::config::{DATABASE_ID_VAR, TOKEN_VAR};
use notion_relay_core::identifier::looks_like_database_id;

const TOKEN_PLACEHOLDER: &str = "your_notion_integration_token_here";
const DATABASE_ID_PLACEHOLDER: &str = "your_notion_database_id_here";

/// Prefixes Notion uses for internal integration tokens.
const TOKEN_PREFIXES: &[&str] = &["secret_", "ntn_"];

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub ok: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check the relay configuration without contacting Notion.
///
/// `env_file_found` is whether a `.env` file was loaded.
pub fn validate(
    settings: &RelaySettings,
    api_base: &str,
    env_file_found: bool,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !env_file_found {
        report
            .warnings
            .push(".env file not found, using the process environment only".into());
    }

    match settings.notion_token.as_deref().filter(|t| !t.is_empty()) {
        None => report.errors.push(format!("{TOKEN_VAR} is required")),
        Some(TOKEN_PLACEHOLDER) => report
            .errors
            .push(format!("{TOKEN_VAR} is still set to placeholder value")),
        Some(token) if !TOKEN_PREFIXES.iter().any(|p| token.starts_with(p)) => report.warnings.push(
            format!("{TOKEN_VAR} should start with one of {}", TOKEN_PREFIXES.join(", ")),
        ),
        Some(_) => report.ok.push(format!("{TOKEN_VAR} configured")),
    }

    match settings.database_id.as_deref().filter(|d| !d.is_empty()) {
        None => report.errors.push(format!("{DATABASE_ID_VAR} is required")),
        Some(DATABASE_ID_PLACEHOLDER) => report
            .errors
            .push(format!("{DATABASE_ID_VAR} is still set to placeholder value")),
        Some(id) if !looks_like_database_id(id) => report.warnings.push(format!(
            "{DATABASE_ID_VAR} format looks unusual (should be 32 hex characters, optionally with hyphens)"
        )),
        Some(_) => report.ok.push(format!("{DATABASE_ID_VAR} configured")),
    }

    match reqwest::Url::parse(api_base) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            report.ok.push(format!("API base {api_base}"));
        }
        _ => report
            .errors
            .push(format!("API base {api_base:?} is not an http(s) URL")),
    }

    report
}

/// Print a report the way the `validate-config` command shows it.
pub fn print_report(report: &ValidationReport) {
    println!("Validating Notion relay configuration...");
    println!();
    for line in &report.ok {
        println!("  ok       {line}");
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors (must fix):");
        for error in &report.errors {
            println!("  - {error}");
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings (should review):");
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }

    println!();
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("Configuration looks good.");
    } else if report.errors.is_empty() {
        println!("Configuration is valid (with warnings above).");
    }
}
