use crate::record::{
    Column, KNOWN_STATUSES, Record, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_ONGOING,
    STATUS_TO_BE_PICKED,
};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

lazy_static! {
    static ref ISO_DATE_PREFIX: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})").unwrap();
}

/// Wire value meaning "no constraint" for a select filter.
pub const ANY: &str = "all";

/// The filters currently applied to the table.
///
/// Each select constraint is `None` when unset. When deserialized from a
/// query string, both a missing key and the value `all` map to `None`.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Criteria {
    #[serde(default)]
    pub query: String,
    #[serde(default, deserialize_with = "constraint")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "constraint")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "constraint")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "constraint")]
    pub owner: Option<String>,
}

fn constraint<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty() && v != ANY))
}

fn constraint_matches(constraint: &Option<String>, value: &str) -> bool {
    constraint.as_deref().is_none_or(|wanted| wanted == value)
}

impl Criteria {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// True when any filter would narrow the table.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
            || self.status.is_some()
            || self.priority.is_some()
            || self.team.is_some()
            || self.owner.is_some()
    }

    /// Reset every filter.
    pub fn clear(&mut self) {
        *self = Criteria::default();
    }

    /// Whether a single record passes every active filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_query(record)
            && constraint_matches(&self.status, &record.status)
            && constraint_matches(&self.priority, &record.priority)
            && constraint_matches(&self.team, &record.team)
            && constraint_matches(&self.owner, &record.owner)
    }

    fn matches_query(&self, record: &Record) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        [&record.goals, &record.owner, &record.team]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Records passing `criteria`, in their original order.
pub fn visible_records(all: &[Record], criteria: &Criteria) -> Vec<Record> {
    all.iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Totals shown in the summary buttons.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub total: usize,
    pub in_progress: usize,
    pub ongoing: usize,
    pub to_be_picked: usize,
    pub completed: usize,
}

/// Count records per known status. Always run this over the unfiltered
/// list; the buttons must not move while filters change. Unknown statuses
/// only add to `total`.
pub fn summary_counts(all: &[Record]) -> Counts {
    let mut counts = Counts {
        total: all.len(),
        ..Counts::default()
    };

    for record in all {
        match record.status.as_str() {
            STATUS_IN_PROGRESS => counts.in_progress += 1,
            STATUS_ONGOING => counts.ongoing += 1,
            STATUS_TO_BE_PICKED => counts.to_be_picked += 1,
            STATUS_COMPLETED => counts.completed += 1,
            _ => {}
        }
    }

    counts
}

/// Distinct non-empty values of `column`, in first-seen order.
pub fn distinct_values(all: &[Record], column: Column) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for record in all {
        let value = record.get(column);
        if !value.is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Choices for each select menu.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub teams: Vec<String>,
    pub owners: Vec<String>,
    pub priorities: Vec<String>,
}

impl FilterOptions {
    /// The status menu always lists the known statuses first, then any
    /// other status the sheet uses.
    pub fn from_records(all: &[Record]) -> Self {
        let mut statuses: Vec<String> = KNOWN_STATUSES.iter().map(|s| s.to_string()).collect();
        for record in all.iter().filter(|record| !record.has_known_status()) {
            if !record.status.is_empty() && !statuses.contains(&record.status) {
                statuses.push(record.status.clone());
            }
        }

        FilterOptions {
            statuses,
            teams: distinct_values(all, Column::Team),
            owners: distinct_values(all, Column::Owner),
            priorities: distinct_values(all, Column::Priority),
        }
    }
}

/// Records the page already holds plus the filters to apply to them.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct ViewRequest {
    pub records: Vec<Record>,
    #[serde(default)]
    pub criteria: Criteria,
}

/// A visible row plus its display-ready dates.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    #[serde(flatten)]
    pub record: Record,
    pub eta_label: String,
    pub completion_label: String,
}

impl From<Record> for RowView {
    fn from(record: Record) -> Self {
        RowView {
            eta_label: format_date(&record.eta),
            completion_label: format_date(&record.completion_date),
            record,
        }
    }
}

/// Everything the dashboard page needs for one render.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DashboardView {
    pub records: Vec<RowView>,
    pub counts: Counts,
    pub options: FilterOptions,
    pub criteria: Criteria,
    pub filtered: bool,
}

impl DashboardView {
    pub fn build(all: &[Record], criteria: Criteria) -> Self {
        DashboardView {
            records: visible_records(all, &criteria)
                .into_iter()
                .map(RowView::from)
                .collect(),
            counts: summary_counts(all),
            options: FilterOptions::from_records(all),
            filtered: criteria.is_active(),
            criteria,
        }
    }
}

/// Render a sheet date as `Nov 30, 2025`.
///
/// Empty cells render as `-`. Anything that does not start with an ISO
/// `YYYY-MM-DD` date is shown as typed.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return "-".to_string();
    }

    ISO_DATE_PREFIX
        .captures(value)
        .and_then(|caps| NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok())
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}
