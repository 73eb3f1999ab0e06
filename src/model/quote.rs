use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

use crate::repository::database::parse_timestamp;

/// Lifecycle stage of a quote request in the admin workflow.
///
/// Any status may follow any other; only membership in this set is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    New,
    Contacted,
    Quoted,
    Completed,
    Cancelled,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::New,
        QuoteStatus::Contacted,
        QuoteStatus::Quoted,
        QuoteStatus::Completed,
        QuoteStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::New => "new",
            QuoteStatus::Contacted => "contacted",
            QuoteStatus::Quoted => "quoted",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for QuoteStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuoteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

/// A persisted quote request (`quotes` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: i64,
    pub quote_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub suburb: String,
    pub postcode: String,
    pub service_type: String,
    pub roof_type: Option<String>,
    pub timeframe: Option<String>,
    pub message: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for QuoteRequest {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<QuoteStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(QuoteRequest {
            id: row.try_get("id")?,
            quote_number: row.try_get("quote_number")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            suburb: row.try_get("suburb")?,
            postcode: row.try_get("postcode")?,
            service_type: row.try_get("service_type")?,
            roof_type: row.try_get("roof_type")?,
            timeframe: row.try_get("timeframe")?,
            message: row.try_get("message")?,
            status,
            created_at: parse_timestamp(&created_at).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            updated_at: parse_timestamp(&updated_at).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        })
    }
}

/// Validated submission ready to be inserted; the quote number is already assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub quote_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub suburb: String,
    pub postcode: String,
    pub service_type: String,
    pub roof_type: Option<String>,
    pub timeframe: Option<String>,
    pub message: Option<String>,
}
