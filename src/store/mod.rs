//! Store layer: appends result rows to the shared spreadsheet.
//!
//! [`WorksheetClient`] is the narrow interface consumed from the remote
//! spreadsheet service (open by name, read values, append, format).
//! [`StoreAdapter`] drives it for one submission: append the row, then
//! center-align the whole used range.
//!
//! Two clients are provided: [`GoogleSheetsClient`] for the real service and
//! [`MemoryWorksheetClient`] for local runs and tests.

pub mod credentials;
pub mod error;
pub mod google;
pub mod memory;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CellValue, ResultRecord};

pub use credentials::{AccessToken, CredentialSource, ServiceAccountKey};
pub use error::StoreError;
pub use google::{GoogleEndpoints, GoogleSheetsClient};
pub use memory::MemoryWorksheetClient;

/// Boxed future returned by [`WorksheetClient`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// An opened worksheet: the first sheet of a spreadsheet found by title.
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Remote spreadsheet identifier.
    pub spreadsheet_id: String,
    /// Numeric identifier of the worksheet inside the spreadsheet.
    pub sheet_id: i64,
    /// Worksheet tab title.
    pub title: String,
    /// Credential the worksheet was opened with.
    pub token: AccessToken,
}

/// Horizontal alignment applied by [`WorksheetClient::format_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalAlignment {
    /// Flush left.
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

impl HorizontalAlignment {
    /// Value understood by the Sheets API.
    #[must_use]
    pub const fn as_api_str(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Center => "CENTER",
            Self::Right => "RIGHT",
        }
    }
}

/// Rectangle anchored at `A1` covering `rows` × `columns` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    rows: usize,
    columns: usize,
}

impl CellRange {
    /// Range covering the used area, or `None` when either side is zero.
    #[must_use]
    pub const fn covering(rows: usize, columns: usize) -> Option<Self> {
        if rows == 0 || columns == 0 {
            None
        } else {
            Some(Self { rows, columns })
        }
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// A1 notation, e.g. `A1:N12`.
    #[must_use]
    pub fn to_a1(&self) -> String {
        format!("A1:{}{}", column_letters(self.columns), self.rows)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Spreadsheet column name of the 1-based column `index` (`1` → `A`,
/// `27` → `AA`). Returns an empty string for `0`.
#[must_use]
pub fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26
        #[allow(clippy::cast_possible_truncation)]
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Remote tabular store operations needed to append and format a row.
pub trait WorksheetClient: Send + Sync + fmt::Debug {
    /// Authenticates and opens the first worksheet of the spreadsheet titled
    /// `title`.
    fn open_by_name<'a>(&'a self, title: &'a str) -> StoreFuture<'a, Worksheet>;

    /// Every populated row, as displayed text.
    fn read_all_values<'a>(&'a self, sheet: &'a Worksheet) -> StoreFuture<'a, Vec<Vec<String>>>;

    /// The first row, as displayed text.
    fn read_header_row<'a>(&'a self, sheet: &'a Worksheet) -> StoreFuture<'a, Vec<String>>;

    /// Appends `row` after the last populated row.
    fn append_row<'a>(&'a self, sheet: &'a Worksheet, row: &'a [CellValue]) -> StoreFuture<'a, ()>;

    /// Sets the horizontal alignment of every cell in `range`.
    fn format_range<'a>(
        &'a self,
        sheet: &'a Worksheet,
        range: CellRange,
        alignment: HorizontalAlignment,
    ) -> StoreFuture<'a, ()>;
}

/// What an append left behind in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AppendReceipt {
    /// Populated rows after the append, header included.
    pub total_rows: usize,
    /// Range that was center-aligned, in A1 notation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_range: Option<String>,
}

/// Appends result records to the spreadsheet named at construction.
#[derive(Debug, Clone)]
pub struct StoreAdapter {
    client: Arc<dyn WorksheetClient>,
    spreadsheet_title: String,
}

impl StoreAdapter {
    /// Creates an adapter writing to the spreadsheet titled
    /// `spreadsheet_title` through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn WorksheetClient>, spreadsheet_title: impl Into<String>) -> Self {
        Self {
            client,
            spreadsheet_title: spreadsheet_title.into(),
        }
    }

    /// Title of the target spreadsheet.
    #[must_use]
    pub fn spreadsheet_title(&self) -> &str {
        &self.spreadsheet_title
    }

    /// Appends `record` as a new trailing row, then center-aligns the range
    /// spanning every populated row and the header's columns.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on the first failing step. A failure after the
    /// append leaves the row in place; nothing is rolled back.
    pub async fn append(&self, record: &ResultRecord) -> Result<AppendReceipt, StoreError> {
        let sheet = self.client.open_by_name(&self.spreadsheet_title).await?;
        let row = record.to_row();
        self.client.append_row(&sheet, &row).await?;

        let total_rows = self.client.read_all_values(&sheet).await?.len();
        let columns = self.client.read_header_row(&sheet).await?.len();

        let formatted_range = match CellRange::covering(total_rows, columns) {
            Some(range) => {
                self.client
                    .format_range(&sheet, range, HorizontalAlignment::Center)
                    .await?;
                Some(range.to_a1())
            }
            None => {
                tracing::warn!(
                    spreadsheet = %self.spreadsheet_title,
                    total_rows,
                    columns,
                    "sheet has no header row; skipping alignment"
                );
                None
            }
        };

        tracing::info!(
            spreadsheet = %self.spreadsheet_title,
            worksheet = %sheet.title,
            total_rows,
            "result row appended"
        );
        Ok(AppendReceipt {
            total_rows,
            formatted_range,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BlockForm, EventBlock, PersonalInfo, normalize};
    use chrono::NaiveDate;

    fn record(coach: &str) -> ResultRecord {
        let Some(at) = NaiveDate::from_ymd_opt(2025, 5, 1).and_then(|d| d.and_hms_opt(10, 0, 0))
        else {
            panic!("valid timestamp");
        };
        let personal = PersonalInfo {
            coach_name: coach.to_string(),
            ..PersonalInfo::default()
        };
        let form = BlockForm::new(EventBlock::National, at.date());
        normalize(&personal, &form, &["Ana".to_string()], at)
    }

    #[test]
    fn column_letters_use_bijective_base_26() {
        assert_eq!(column_letters(0), "");
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(14), "N");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(53), "BA");
        assert_eq!(column_letters(702), "ZZ");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn range_requires_a_used_area() {
        assert!(CellRange::covering(0, 14).is_none());
        assert!(CellRange::covering(3, 0).is_none());
        assert_eq!(
            CellRange::covering(10, 14).map(|r| r.to_a1()),
            Some("A1:N10".to_string())
        );
    }

    #[tokio::test]
    async fn append_writes_row_and_centers_used_range() {
        let client = Arc::new(MemoryWorksheetClient::with_header("results"));
        let adapter = StoreAdapter::new(Arc::clone(&client) as Arc<dyn WorksheetClient>, "results");

        let first = adapter.append(&record("Marta")).await;
        let second = adapter.append(&record("Jorge")).await;
        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("appends should succeed");
        };

        assert_eq!(first.total_rows, 2);
        assert_eq!(second.total_rows, 3);
        assert_eq!(second.formatted_range.as_deref(), Some("A1:N3"));

        let rows = client.rows().await;
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.last().and_then(|r| r.get(1)),
            Some(&CellValue::from("Jorge"))
        );

        let formats = client.formatted_ranges().await;
        assert_eq!(
            formats.last(),
            Some(&("A1:N3".to_string(), HorizontalAlignment::Center))
        );
    }

    #[tokio::test]
    async fn append_to_unknown_spreadsheet_fails() {
        let client = Arc::new(MemoryWorksheetClient::with_header("results"));
        let adapter = StoreAdapter::new(Arc::clone(&client) as Arc<dyn WorksheetClient>, "other");

        let result = adapter.append(&record("Marta")).await;
        assert!(matches!(result, Err(StoreError::SpreadsheetNotFound(t)) if t == "other"));
        assert_eq!(client.rows().await.len(), 1);
    }

    #[tokio::test]
    async fn first_row_of_empty_sheet_sets_range_width() {
        let client = Arc::new(MemoryWorksheetClient::new("results"));
        let adapter = StoreAdapter::new(Arc::clone(&client) as Arc<dyn WorksheetClient>, "results");

        let Ok(receipt) = adapter.append(&record("Marta")).await else {
            panic!("append should succeed");
        };
        assert_eq!(receipt.total_rows, 1);
        assert_eq!(receipt.formatted_range.as_deref(), Some("A1:N1"));
    }
}
