use crate::record::Record;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a data line is split into fields.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "web", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CsvMode {
    /// Split on every comma, trim, then drop all `"` characters. A quoted
    /// field holding a comma is split in two. This matches the output the
    /// dashboard has always shown.
    #[default]
    Naive,
    /// RFC 4180 quoting: embedded commas, doubled quotes and quoted newlines.
    Quoted,
}

/// How record ids relate to source rows.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "web", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// Position among non-blank data lines, counted before rows without
    /// goals are dropped. Ids may have gaps.
    #[default]
    Source,
    /// 1..n over the records that survive the goals check.
    Sequential,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: CsvMode,
    pub ids: IdPolicy,
}

/// Parse a CSV export of the program sheet into records.
///
/// Blank lines are skipped, the first remaining line is the header and is
/// not checked, and every later line becomes a record keyed by its column
/// position. Rows whose goals column is empty are dropped. Malformed rows
/// never fail the parse; they degrade into empty fields.
///
/// # Examples
/// ```
/// use board::loader::{parse_records, ParseOptions};
///
/// let text = "Goals,Tasks\nLaunch X,Design\n";
/// let records = parse_records(text, ParseOptions::default());
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].tasks, "Design");
/// ```
pub fn parse_records(text: &str, options: ParseOptions) -> Vec<Record> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let rows = match options.mode {
        CsvMode::Naive => naive_rows(text),
        CsvMode::Quoted => quoted_rows(text),
    };

    let mut records: Vec<Record> = rows
        .iter()
        .enumerate()
        .map(|(index, fields)| Record::from_fields(index + 1, fields.as_slice()))
        .filter(Record::has_goals)
        .collect();

    if options.ids == IdPolicy::Sequential {
        for (index, record) in records.iter_mut().enumerate() {
            record.id = (index + 1).to_string();
        }
    }

    debug!(
        data_rows = rows.len(),
        records = records.len(),
        mode = ?options.mode,
        "parsed sheet export"
    );

    records
}

// Data rows only; the header line is consumed and discarded.
fn naive_rows(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .map(split_naive)
        .collect()
}

fn split_naive(line: &str) -> Vec<String> {
    line.split(',')
        .map(|value| value.trim().replace('"', ""))
        .collect()
}

fn quoted_rows(text: &str) -> Vec<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row = index + 1, error = %e, "skipping unreadable CSV row");
                continue;
            }
        };

        // A whitespace-only line reads as one empty field.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        rows.push(record.iter().map(str::to_string).collect());
    }

    if !rows.is_empty() {
        rows.remove(0);
    }
    rows
}
