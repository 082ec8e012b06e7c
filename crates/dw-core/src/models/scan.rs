//! Scan record model

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Timestamp format of [`ScanRecord::timestamp`] (`DD/MM/YYYY HH:MM:SS`)
pub const SCAN_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// A single successful decode
///
/// Serialized for the UI layer as `{"scanData", "symbology", "dateTime"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Decoded payload
    #[serde(rename = "scanData")]
    data: String,
    /// Barcode format (e.g. `LABEL-TYPE-EAN13`)
    symbology: String,
    /// Receipt time in [`SCAN_TIMESTAMP_FORMAT`]
    #[serde(rename = "dateTime")]
    timestamp: String,
}

impl ScanRecord {
    pub fn new(
        data: impl Into<String>,
        symbology: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            symbology: symbology.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Create a record stamped with the current local wall-clock time
    pub fn captured_now(data: impl Into<String>, symbology: impl Into<String>) -> Self {
        let timestamp = Local::now().format(SCAN_TIMESTAMP_FORMAT).to_string();
        Self::new(data, symbology, timestamp)
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn symbology(&self) -> &str {
        &self.symbology
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Parse the timestamp back into a date/time
    pub fn captured_at(&self) -> CoreResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, SCAN_TIMESTAMP_FORMAT).map_err(|source| {
            CoreError::InvalidTimestamp {
                value: self.timestamp.clone(),
                source,
            }
        })
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "scanData": self.data,
            "symbology": self.symbology,
            "dateTime": self.timestamp,
        })
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
