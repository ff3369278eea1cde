/*!
# Program Board

A small dashboard service for program and partnership tracking rows kept in a
shared spreadsheet.

## Overview

Every read pulls the sheet's CSV export, parses it into [`Record`]s and
either returns them as JSON or narrows them with the view model. Nothing is
cached and nothing is written back. The page reads the sheet once per load
and posts the records it holds back for filtering.

## Modules

- **record**: the `Record` row type and the known status values
- **loader**: CSV text to records (naive comma split or RFC 4180 quoting)
- **view**: filter criteria, visible rows, summary counts, menu options
- **fetcher**: HTTP fetch of the export (`web` feature)
- **app**: axum routes and error mapping (`web` feature)
- **config**: flags and environment (`web` feature)

## REST API Endpoints

- `GET /api/partnerships` - every record, or `500 {"error": ...}`
- `GET /api/partnerships/view` - filtered rows, counts and menu options
- `POST /api/partnerships/view` - the same view over posted records, no upstream read
- `GET /health` - liveness
- `GET /` - dashboard page
*/

pub mod loader;
pub mod record;
pub mod view;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod config;
#[cfg(feature = "web")]
pub mod error;
#[cfg(feature = "web")]
pub mod fetcher;

pub use loader::{CsvMode, IdPolicy, ParseOptions, parse_records};
pub use record::*;
pub use view::*;
