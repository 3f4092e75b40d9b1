//! Extracted field maps.
//!
//! The extraction gateway returns raw text fields; the sanitizer turns them
//! into typed canonical values that are merged into parties and certificates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field map as returned by the extraction gateway, before sanitization.
pub type RawFieldMap = BTreeMap<String, String>;

/// Field map after sanitization, keyed by the extracted field name.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// One normalized field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text, trimmed.
    Text(String),
    /// Monetary amount in integer cents.
    Money(i64),
    /// Calendar date in the canonical ISO calendar.
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns the text content if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the amount in cents if this is a monetary field.
    pub fn as_money_cents(&self) -> Option<i64> {
        match self {
            FieldValue::Money(cents) => Some(*cents),
            _ => None,
        }
    }

    /// Returns the date if this is a date field.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Money(cents) => {
                write!(f, "{}.{:02}", cents / 100, (cents % 100).abs())
            }
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
