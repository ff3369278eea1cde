//! Row fetcher: pulls the sheet's CSV export and parses it into records.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::loader::{ParseOptions, parse_records};
use crate::record::Record;

pub const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";
pub const DEFAULT_DOCUMENT_ID: &str = "1u5QU1aI2pDJgc5koh8cLoHpYPDwLSuwe0uun9uhPcRM";
/// Partnerships tab.
pub const DEFAULT_SHEET_GID: &str = "466045236";

/// Where the program sheet lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetSource {
    pub base_url: String,
    pub document_id: String,
    pub sheet_gid: String,
}

impl Default for SheetSource {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            document_id: DEFAULT_DOCUMENT_ID.to_string(),
            sheet_gid: DEFAULT_SHEET_GID.to_string(),
        }
    }
}

impl SheetSource {
    /// CSV export URL for the configured tab.
    ///
    /// # Examples
    /// ```
    /// use board::fetcher::SheetSource;
    ///
    /// let source = SheetSource {
    ///     base_url: "http://localhost:9000/d/".to_string(),
    ///     document_id: "abc".to_string(),
    ///     sheet_gid: "7".to_string(),
    /// };
    /// assert_eq!(source.export_url(), "http://localhost:9000/d/abc/export?format=csv&gid=7");
    /// ```
    pub fn export_url(&self) -> String {
        format!(
            "{}/{}/export?format=csv&gid={}",
            self.base_url.trim_end_matches('/'),
            self.document_id,
            self.sheet_gid
        )
    }
}

/// Anything that can produce the full record list on demand.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<Record>, FetchError>;
}

/// Fetches the sheet over HTTP on every call. One attempt, no retries, no
/// caching between calls.
pub struct RowFetcher {
    client: reqwest::Client,
    source: SheetSource,
    options: ParseOptions,
}

impl RowFetcher {
    pub fn new(
        source: SheetSource,
        options: ParseOptions,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        info!(
            url = %source.export_url(),
            mode = ?options.mode,
            ids = ?options.ids,
            "row fetcher configured"
        );

        Ok(Self {
            client,
            source,
            options,
        })
    }

    /// Raw CSV text of the export.
    pub async fn fetch_text(&self) -> Result<String, FetchError> {
        let url = self.source.export_url();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Body {
                url: url.clone(),
                source,
            })?;

        debug!(url = %url, bytes = text.len(), "fetched sheet export");
        Ok(text)
    }
}

#[async_trait]
impl RecordSource for RowFetcher {
    async fn fetch_records(&self) -> Result<Vec<Record>, FetchError> {
        let text = self.fetch_text().await?;
        Ok(parse_records(&text, self.options))
    }
}
