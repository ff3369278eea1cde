//! Server configuration from flags and environment.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use crate::fetcher::{DEFAULT_BASE_URL, DEFAULT_DOCUMENT_ID, DEFAULT_SHEET_GID, SheetSource};
use crate::loader::{CsvMode, IdPolicy, ParseOptions};

/// Program board - tracking dashboard backed by a shared sheet
#[derive(Parser, Debug, Clone)]
#[command(name = "program-board")]
#[command(about = "Serves program-tracking rows from a shared spreadsheet")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// Spreadsheet document id
    #[arg(long, env = "SHEET_ID", default_value = DEFAULT_DOCUMENT_ID)]
    pub sheet_id: String,

    /// Tab (gid) inside the document
    #[arg(long, env = "SHEET_GID", default_value = DEFAULT_SHEET_GID)]
    pub sheet_gid: String,

    /// Base URL the document id is appended to
    #[arg(long, env = "SHEETS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub sheets_base_url: String,

    /// Upstream request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// CSV dialect: naive comma split, or RFC 4180 quoting
    #[arg(long, env = "CSV_MODE", value_enum, default_value_t = CsvMode::Naive)]
    pub csv_mode: CsvMode,

    /// Record id numbering: source line position, or sequential after drops
    #[arg(long, env = "ID_POLICY", value_enum, default_value_t = IdPolicy::Source)]
    pub id_policy: IdPolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn sheet_source(&self) -> SheetSource {
        SheetSource {
            base_url: self.sheets_base_url.clone(),
            document_id: self.sheet_id.clone(),
            sheet_gid: self.sheet_gid.clone(),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            mode: self.csv_mode,
            ids: self.id_policy,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sheet_id.trim().is_empty() {
            return Err("SHEET_ID must not be empty".to_string());
        }
        if self.sheet_gid.trim().is_empty() {
            return Err("SHEET_GID must not be empty".to_string());
        }
        if !(self.sheets_base_url.starts_with("http://")
            || self.sheets_base_url.starts_with("https://"))
        {
            return Err(format!(
                "SHEETS_BASE_URL must be an http(s) URL, got {}",
                self.sheets_base_url
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }
        Ok(())
    }
}
