use serde::{Deserialize, Serialize};

/// Status values the dashboard knows how to bucket.
pub const STATUS_TO_BE_PICKED: &str = "To be picked";
pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_ONGOING: &str = "Ongoing";
pub const STATUS_COMPLETED: &str = "Completed";

/// The four known statuses, in the order the filter menu lists them.
pub const KNOWN_STATUSES: [&str; 4] = [
    STATUS_TO_BE_PICKED,
    STATUS_IN_PROGRESS,
    STATUS_ONGOING,
    STATUS_COMPLETED,
];

/// One program-tracking row from the shared sheet.
///
/// Every field is a plain string; columns missing from the source row are
/// empty, never absent. The serialized form uses the camelCase names the
/// browser client reads.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub goals: String,
    pub tasks: String,
    pub team: String,
    pub priority: String,
    pub owner: String,
    pub status: String,
    pub eta: String,
    pub completion_date: String,
    pub links: String,
    pub notes: String,
}

/// Columns that can populate a filter menu.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Team,
    Owner,
    Priority,
    Status,
}

impl Record {
    /// Builds a record from positional fields in sheet column order:
    /// goals, tasks, team, priority, owner, status, eta, completion date,
    /// links, notes. Missing trailing fields become empty strings and extra
    /// fields are ignored.
    pub fn from_fields<S: AsRef<str>>(id: usize, fields: &[S]) -> Self {
        let field = |i: usize| {
            fields
                .get(i)
                .map(|f| f.as_ref().to_string())
                .unwrap_or_default()
        };

        Record {
            id: id.to_string(),
            goals: field(0),
            tasks: field(1),
            team: field(2),
            priority: field(3),
            owner: field(4),
            status: field(5),
            eta: field(6),
            completion_date: field(7),
            links: field(8),
            notes: field(9),
        }
    }

    /// A row without goals is a spacer or an unfinished entry, not a program.
    pub fn has_goals(&self) -> bool {
        !self.goals.trim().is_empty()
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Team => &self.team,
            Column::Owner => &self.owner,
            Column::Priority => &self.priority,
            Column::Status => &self.status,
        }
    }

    /// Whether the status is one of the four bucketed values.
    pub fn has_known_status(&self) -> bool {
        KNOWN_STATUSES.contains(&self.status.as_str())
    }
}
