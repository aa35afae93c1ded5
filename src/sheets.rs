//! Record Source: the Google Sheets spreadsheet acting as a makeshift
//! database.
//!
//! Every call fetches the full sheet through the `values.get` REST endpoint
//! and converts rows to records positionally. There is deliberately no
//! caching: each request operates on its own freshly fetched copy.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{AccessibilityRecord, BARRIER_FREE_SLOTS};

/// Rows shorter than this are treated as malformed and dropped.
const MIN_ROW_LEN: usize = 35;

/// Shared HTTP client. The overall request timeout is the only bound on a
/// slow sheet fetch.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("jeju-barrier/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// Shape of the `values.get` response body.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Client for one spreadsheet range.
#[derive(Debug, Clone)]
pub struct SheetClient {
    base_url: String,
    spreadsheet_id: String,
    range: String,
    api_key: String,
}

impl SheetClient {
    pub fn new(base_url: &str, spreadsheet_id: &str, range: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch the full current record set.
    ///
    /// Malformed rows are dropped silently; a transport or HTTP failure
    /// surfaces as [`Error::SheetUnavailable`] and no partial result is
    /// returned.
    pub async fn fetch_records(&self) -> Result<Vec<AccessibilityRecord>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, self.range
        );

        let response = HTTP_CLIENT
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::SheetUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::SheetUnavailable(format!(
                "sheet request failed: {status}"
            )));
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| Error::SheetUnavailable(e.to_string()))?;

        info!(rows = body.values.len(), "received sheet data");

        let records: Vec<AccessibilityRecord> = body
            .values
            .iter()
            .filter_map(|row| {
                let record = convert_row(row);
                if record.is_none() {
                    debug!(cells = row.len(), "skipping malformed row");
                }
                record
            })
            .collect();

        if records.len() < body.values.len() {
            warn!(
                dropped = body.values.len() - records.len(),
                "dropped malformed rows"
            );
        }

        Ok(records)
    }
}

/// Convert one spreadsheet row to a record.
///
/// Columns map positionally; rows under [`MIN_ROW_LEN`] cells are rejected.
/// The title column (index 35) may be absent on a minimum-length row, in
/// which case the title is empty.
pub fn convert_row(row: &[Value]) -> Option<AccessibilityRecord> {
    if row.len() < MIN_ROW_LEN {
        return None;
    }

    let mut barrier_free: [String; BARRIER_FREE_SLOTS] = Default::default();
    for (i, slot) in barrier_free.iter_mut().enumerate() {
        *slot = cell_text(row, 11 + i);
    }

    Some(AccessibilityRecord {
        id: cell_text(row, 0),
        description: cell_text(row, 1),
        address: cell_text(row, 2),
        phone: cell_text(row, 3),
        schedule: cell_text(row, 4),
        thumbnails: cell_text(row, 5),
        thumb: cell_text(row, 6),
        lat: cell_text(row, 7),
        lon: cell_text(row, 8),
        hints: cell_text(row, 9),
        category: cell_text(row, 10),
        barrier_free,
        slope: cell_text(row, 27),
        slope_scale: cell_text(row, 28),
        elevator: cell_text(row, 29),
        toilet: cell_text(row, 30),
        parking: cell_text(row, 31),
        table: cell_text(row, 32),
        total: cell_text(row, 33),
        accessibility: cell_text(row, 34),
        title: cell_text(row, 35),
        distance: None,
    })
}

/// Read a cell as trimmed text. Missing cells, JSON nulls and the literal
/// string "null" all normalize to the empty string.
fn cell_text(row: &[Value], index: usize) -> String {
    let Some(cell) = row.get(index) else {
        return String::new();
    };
    let text = match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    if text == "null" {
        String::new()
    } else {
        text
    }
}
