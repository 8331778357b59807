//! Per-request relay settings.

use crate::error::RelayError;

pub const TOKEN_VAR: &str = "NOTION_TOKEN";
pub const DATABASE_ID_VAR: &str = "NOTION_DB_ID";

/// Credential and target database, as configured. Either may be missing.
#[derive(Debug, Clone, Default)]
pub struct RelaySettings {
    pub notion_token: Option<String>,
    pub database_id: Option<String>,
}

/// Settings that passed [`RelaySettings::require`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayTarget {
    pub notion_token: String,
    /// Raw, un-normalised database identifier.
    pub database_id: String,
}

impl RelaySettings {
    /// Both values, or a configuration error naming the first missing one.
    ///
    /// Empty strings count as missing.
    pub fn require(&self) -> Result<RelayTarget, RelayError> {
        let notion_token =
            present(&self.notion_token).ok_or(RelayError::Configuration(TOKEN_VAR))?;
        let database_id =
            present(&self.database_id).ok_or(RelayError::Configuration(DATABASE_ID_VAR))?;
        Ok(RelayTarget {
            notion_token: notion_token.to_string(),
            database_id: database_id.to_string(),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>, db: Option<&str>) -> RelaySettings {
        RelaySettings {
            notion_token: token.map(Into::into),
            database_id: db.map(Into::into),
        }
    }

    #[test]
    fn both_present() {
        let target = settings(Some("secret_x"), Some("abc")).require().unwrap();
        assert_eq!(target.notion_token, "secret_x");
        assert_eq!(target.database_id, "abc");
    }

    #[test]
    fn token_checked_first() {
        let err = settings(None, None).require().unwrap_err();
        assert_eq!(err.to_string(), "Missing NOTION_TOKEN environment variable");
    }

    #[test]
    fn missing_database_id() {
        let err = settings(Some("secret_x"), None).require().unwrap_err();
        assert_eq!(err.to_string(), "Missing NOTION_DB_ID environment variable");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn empty_values_are_missing() {
        let err = settings(Some(""), Some("")).require().unwrap_err();
        assert!(matches!(err, RelayError::Configuration(TOKEN_VAR)));
    }
}
