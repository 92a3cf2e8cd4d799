//! The 14-column row persisted for each submission.
//!
//! [`normalize`] flattens the personal block, one event block and its
//! athlete roster into a [`ResultRecord`]; [`ResultRecord::to_row`] lays the
//! record out in the sheet's fixed column order.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::block::{EventName, Role};
use super::form_session::{BlockForm, PersonalInfo};

/// Number of columns in a result row.
pub const COLUMN_COUNT: usize = 14;

/// Header labels, in row order.
pub const COLUMN_HEADERS: [&str; COLUMN_COUNT] = [
    "Registration Date",
    "Coach Name",
    "League",
    "Identity Document",
    "Event",
    "Date",
    "Venue",
    "Discipline",
    "Role",
    "Gold",
    "Silver",
    "Bronze",
    "Rank 4-8",
    "Athlete Names",
];

/// `strftime` pattern of the registration timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `strftime` pattern of the event date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single spreadsheet cell.
///
/// Serialized untagged so integers reach the sheet as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum CellValue {
    /// Whole number.
    Integer(u32),
    /// Free text.
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        Self::Integer(n)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One submission, immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResultRecord {
    /// Submission time, `YYYY-MM-DD HH:MM:SS`.
    pub registered_at: String,
    /// Coach name.
    pub coach_name: String,
    /// League.
    pub league: String,
    /// Identity document.
    pub identity_document: String,
    /// Event name.
    pub event: EventName,
    /// Event date, `YYYY-MM-DD`.
    pub event_date: String,
    /// Venue.
    pub venue: String,
    /// Discipline or test.
    pub discipline: String,
    /// Coach role.
    pub role: Role,
    /// Gold medals.
    pub gold: u32,
    /// Silver medals.
    pub silver: u32,
    /// Bronze medals.
    pub bronze: u32,
    /// 4th-8th place finishes.
    pub rank_4_to_8: u32,
    /// Athletes joined with `", "`.
    pub athletes: String,
}

impl ResultRecord {
    /// Cells in sheet column order.
    #[must_use]
    pub fn to_row(&self) -> [CellValue; COLUMN_COUNT] {
        [
            self.registered_at.as_str().into(),
            self.coach_name.as_str().into(),
            self.league.as_str().into(),
            self.identity_document.as_str().into(),
            self.event.label().into(),
            self.event_date.as_str().into(),
            self.venue.as_str().into(),
            self.discipline.as_str().into(),
            self.role.label().into(),
            self.gold.into(),
            self.silver.into(),
            self.bronze.into(),
            self.rank_4_to_8.into(),
            self.athletes.as_str().into(),
        ]
    }
}

/// Builds the record for one block submission.
///
/// Pure: missing inputs pass through as empty strings or zero counts.
#[must_use]
pub fn normalize(
    personal: &PersonalInfo,
    form: &BlockForm,
    athletes: &[String],
    registered_at: NaiveDateTime,
) -> ResultRecord {
    ResultRecord {
        registered_at: registered_at.format(TIMESTAMP_FORMAT).to_string(),
        coach_name: personal.coach_name.clone(),
        league: personal.league.clone(),
        identity_document: personal.identity_document.clone(),
        event: form.event,
        event_date: format_date(form.event_date),
        venue: form.venue.clone(),
        discipline: form.discipline.clone(),
        role: form.role,
        gold: form.gold,
        silver: form.silver,
        bronze: form.bronze,
        rank_4_to_8: form.rank_4_to_8,
        athletes: athletes.join(super::roster::NAME_SEPARATOR),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
