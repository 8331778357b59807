//! Value projection: payload values → Notion property values.
//!
//! Each column type has a strict rule. A value that doesn't fit a strict rule
//! is either omitted (non-numeric into `number`, non-date into `date`) or, when
//! projection itself fails, written as text instead. `select` and
//! `multi_select` are always written as text so the relay never has to manage
//! option vocabularies.

use serde::Serialize;
use serde_json::Number;
use thiserror::Error;
use tracing::warn;

use crate::payload::{PayloadValue, has_date_prefix};
use crate::schema::ColumnType;

/// Maximum length of a text fragment, in characters.
pub const TEXT_LIMIT: usize = 2000;

/// A typed property value in Notion's page-property wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<TextFragment>),
    RichText(Vec<TextFragment>),
    Number(Number),
    Checkbox(bool),
    Date(DateValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextFragment {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub text: TextContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateValue {
    pub start: String,
}

impl PropertyValue {
    pub fn title(content: impl Into<String>) -> Self {
        Self::Title(vec![TextFragment {
            kind: None,
            text: TextContent {
                content: content.into(),
            },
        }])
    }

    /// A rich-text value, truncated to [`TEXT_LIMIT`] characters.
    pub fn text(content: &str) -> Self {
        Self::RichText(vec![TextFragment {
            kind: Some("text"),
            text: TextContent {
                content: truncate_chars(content, TEXT_LIMIT).to_string(),
            },
        }])
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("{0:?} is outside the representable number range")]
    NonFinite(String),
}

/// Project a value under its column's strict rule.
///
/// `Ok(None)` means the value doesn't belong in the column and is omitted.
pub fn project(
    value: &PayloadValue,
    column: &ColumnType,
) -> Result<Option<PropertyValue>, ProjectionError> {
    match column {
        ColumnType::Number => Ok(to_number(value)?.map(PropertyValue::Number)),
        ColumnType::Boolean => Ok(Some(PropertyValue::Checkbox(value.is_truthy()))),
        ColumnType::Date => Ok(match value {
            PayloadValue::Text(s) if has_date_prefix(s) => Some(PropertyValue::Date(DateValue {
                start: s.clone(),
            })),
            _ => None,
        }),
        ColumnType::Text
        | ColumnType::Select
        | ColumnType::MultiSelect
        | ColumnType::Title
        | ColumnType::Other(_) => Ok(Some(text_fallback(value))),
    }
}

/// Project one payload field, falling back to text if strict projection fails.
pub fn project_field(
    key: &str,
    value: &PayloadValue,
    column: &ColumnType,
) -> Option<PropertyValue> {
    match project(value, column) {
        Ok(projected) => projected,
        Err(e) => {
            warn!(
                field = key,
                column_type = %column,
                error = %e,
                "projection failed, writing as text"
            );
            Some(text_fallback(value))
        }
    }
}

fn text_fallback(value: &PayloadValue) -> PropertyValue {
    PropertyValue::text(&value.to_text())
}

/// Numeric coercion with JavaScript `Number()` rules: `null` and blank
/// strings are `0`, booleans are `1`/`0`. Arrays and objects are omitted.
fn to_number(value: &PayloadValue) -> Result<Option<Number>, ProjectionError> {
    match value {
        PayloadValue::Number(n) => Ok(Some(n.clone())),
        PayloadValue::Bool(b) => Ok(Some(Number::from(u8::from(*b)))),
        PayloadValue::Text(s) => parse_number(s),
        PayloadValue::Null => Ok(Some(Number::from(0))),
        PayloadValue::Nested(_) => Ok(None),
    }
}

/// Parse a number out of a string: decimal, or unsigned `0x`/`0o`/`0b`
/// integers. Anything else yields `None`.
fn parse_number(s: &str) -> Result<Option<Number>, ProjectionError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Some(Number::from(0)));
    }
    if let Some(radix) = radix_prefix(s) {
        return parse_radix(s, &s[2..], radix);
    }
    if matches!(s.strip_prefix(['+', '-']).unwrap_or(s), "Infinity") {
        return Err(ProjectionError::NonFinite(s.to_string()));
    }
    let numeric_chars = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E');
    if !s.chars().all(numeric_chars) {
        return Ok(None);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Ok(Some(Number::from(i)));
    }
    let Ok(f) = s.parse::<f64>() else {
        return Ok(None);
    };
    to_finite(s, f)
}

fn radix_prefix(s: &str) -> Option<u32> {
    match s.get(..2)? {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    }
}

fn parse_radix(s: &str, digits: &str, radix: u32) -> Result<Option<Number>, ProjectionError> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Ok(None);
    }
    if let Ok(i) = u64::from_str_radix(digits, radix) {
        return Ok(Some(Number::from(i)));
    }
    // Too wide for u64: widen to f64 the way JavaScript does.
    let f = digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0f64, |acc, d| acc * f64::from(radix) + f64::from(d));
    to_finite(s, f)
}

fn to_finite(s: &str, f: f64) -> Result<Option<Number>, ProjectionError> {
    Number::from_f64(f)
        .map(Some)
        .ok_or_else(|| ProjectionError::NonFinite(s.to_string()))
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pv(value: serde_json::Value) -> PayloadValue {
        PayloadValue::from(value)
    }

    fn wire(value: &PropertyValue) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn numbers_pass_through_unchanged() {
        for n in [json!(42), json!(-7), json!(3.25), json!(0)] {
            let got = project(&pv(n.clone()), &ColumnType::Number).unwrap().unwrap();
            assert_eq!(wire(&got), json!({ "number": n }));
        }
    }

    #[test]
    fn numeric_strings_coerced() {
        let got = project(&pv(json!(" 42 ")), &ColumnType::Number).unwrap().unwrap();
        assert_eq!(wire(&got), json!({"number": 42}));
        let got = project(&pv(json!("1.5e2")), &ColumnType::Number).unwrap().unwrap();
        assert_eq!(wire(&got), json!({"number": 150.0}));
    }

    #[test]
    fn non_numeric_omitted_from_number_column() {
        let values = [
            json!("abc"),
            json!("NaN"),
            json!("12px"),
            json!("0x1g"),
            json!("-0x10"),
            json!([1]),
        ];
        for v in values {
            assert_eq!(project(&pv(v.clone()), &ColumnType::Number), Ok(None), "{v}");
        }
    }

    #[test]
    fn blank_and_null_count_as_zero() {
        for v in [json!(""), json!("   "), json!(null)] {
            let got = project(&pv(v.clone()), &ColumnType::Number).unwrap().unwrap();
            assert_eq!(wire(&got), json!({"number": 0}), "{v}");
        }
    }

    #[test]
    fn prefixed_integers_parsed() {
        let cases = [("0x10", 16), ("0XfF", 255), ("0o17", 15), ("0b101", 5), (" 0x10 ", 16)];
        for (s, expected) in cases {
            let got = project(&pv(json!(s)), &ColumnType::Number).unwrap().unwrap();
            assert_eq!(wire(&got), json!({ "number": expected }), "{s}");
        }
    }

    #[test]
    fn infinity_falls_back_to_text() {
        let value = pv(json!("-Infinity"));
        let got = project_field("limit", &value, &ColumnType::Number).unwrap();
        assert_eq!(got, PropertyValue::text("-Infinity"));
    }

    #[test]
    fn booleans_count_as_numbers() {
        let got = project(&pv(json!(true)), &ColumnType::Number).unwrap().unwrap();
        assert_eq!(wire(&got), json!({"number": 1}));
    }

    #[test]
    fn overflowing_number_falls_back_to_text() {
        let value = pv(json!("1e400"));
        assert!(matches!(
            project(&value, &ColumnType::Number),
            Err(ProjectionError::NonFinite(_))
        ));
        let got = project_field("big", &value, &ColumnType::Number).unwrap();
        assert_eq!(got, PropertyValue::text("1e400"));
    }

    #[test]
    fn checkbox_uses_truthiness() {
        let cases = [
            (json!(true), true),
            (json!(false), false),
            (json!("yes"), true),
            (json!(""), false),
            (json!(0), false),
            (json!(2), true),
            (json!(null), false),
        ];
        for (v, expected) in cases {
            let got = project(&pv(v.clone()), &ColumnType::Boolean).unwrap().unwrap();
            assert_eq!(got, PropertyValue::Checkbox(expected), "{v}");
        }
    }

    #[test]
    fn date_strings_projected_as_start() {
        for s in ["2024-01-15", "2024-01-15T09:30:00.000Z"] {
            let got = project(&pv(json!(s)), &ColumnType::Date).unwrap().unwrap();
            assert_eq!(wire(&got), json!({"date": {"start": s}}));
        }
    }

    #[test]
    fn non_dates_omitted_from_date_column() {
        for v in [json!("yesterday"), json!("15-01-2024"), json!(20240115)] {
            assert_eq!(project(&pv(v.clone()), &ColumnType::Date), Ok(None), "{v}");
        }
    }

    #[test]
    fn text_wire_shape() {
        let got = project(&pv(json!("hello")), &ColumnType::Text).unwrap().unwrap();
        assert_eq!(
            wire(&got),
            json!({"rich_text": [{"type": "text", "text": {"content": "hello"}}]})
        );
    }

    #[test]
    fn text_truncated_to_limit() {
        let long = "é".repeat(TEXT_LIMIT + 10);
        let got = project(&pv(json!(long)), &ColumnType::Text).unwrap().unwrap();
        let PropertyValue::RichText(fragments) = got else {
            panic!("expected rich text");
        };
        assert_eq!(fragments[0].text.content.chars().count(), TEXT_LIMIT);
    }

    #[test]
    fn select_columns_downgraded_to_text() {
        for column in [ColumnType::Select, ColumnType::MultiSelect] {
            let got = project(&pv(json!("red")), &column).unwrap().unwrap();
            assert_eq!(got, PropertyValue::text("red"));
        }
    }

    #[test]
    fn unknown_column_types_written_as_text() {
        let got = project(&pv(json!(12)), &ColumnType::Other("url".into()))
            .unwrap()
            .unwrap();
        assert_eq!(got, PropertyValue::text("12"));
    }

    #[test]
    fn title_wire_shape() {
        assert_eq!(
            wire(&PropertyValue::title("Alice")),
            json!({"title": [{"text": {"content": "Alice"}}]})
        );
    }
}
