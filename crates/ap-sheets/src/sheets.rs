//! Google Sheets record source (values API v4).
//!
//! `GET {base_url}/v4/spreadsheets/{spreadsheet_id}/values/{worksheet}?key=…`
//! returns `{"values": [[header…], [cell…], …]}`. The first row is the
//! header; every later row is zipped against it. Short rows are padded with
//! empty cells and fully blank rows are skipped.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use ap_protocol::Record;

use crate::error::{SheetError, SheetResult};
use crate::source::RecordSource;

/// Configuration for the Google Sheets source.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Spreadsheet identifier from the sheet URL.
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Worksheet (tab) holding the inventory.
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// API base URL; overridden in tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// API key. Read from `SHEETS_API_KEY`, never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_worksheet() -> String {
    "Наличие".into()
}
fn default_base_url() -> String {
    "https://sheets.googleapis.com".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            worksheet: default_worksheet(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

/// Values API response (only the field we need).
#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads inventory rows from a Google Sheets worksheet.
pub struct SheetsSource {
    client: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsSource {
    pub fn new(config: SheetsConfig) -> SheetResult<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(SheetError::Config("spreadsheet_id is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SheetError::Config(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn values_url(&self) -> SheetResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| SheetError::Config(format!("base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SheetError::Config("base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                self.config.worksheet.as_str(),
            ]);
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

#[async_trait]
impl RecordSource for SheetsSource {
    async fn fetch_all(&self) -> SheetResult<Vec<Record>> {
        let url = self.values_url()?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SheetError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::SourceUnavailable(format!(
                "sheets api returned {status}"
            )));
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetError::Malformed(e.to_string()))?;

        let records = rows_to_records(body.values);
        tracing::debug!(
            worksheet = %self.config.worksheet,
            record_count = records.len(),
            "fetched inventory"
        );
        Ok(records)
    }

    fn source_name(&self) -> &str {
        "google-sheets"
    }
}

/// Zip data rows against the header row.
fn rows_to_records(rows: Vec<Vec<serde_json::Value>>) -> Vec<Record> {
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(cell_text).collect();

    rows.filter_map(|row| {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            return None;
        }
        let record = Record::from_pairs(header.iter().enumerate().map(|(i, key)| {
            let value = cells.get(i).cloned().unwrap_or_default();
            (key.clone(), value)
        }));
        Some(record)
    })
    .collect()
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
