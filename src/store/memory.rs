//! In-process worksheet used for local runs and tests.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use super::{
    AccessToken, CellRange, HorizontalAlignment, StoreError, StoreFuture, Worksheet,
    WorksheetClient,
};
use crate::domain::{COLUMN_HEADERS, CellValue};

/// A single worksheet kept in memory.
///
/// Mirrors the remote behavior the adapter relies on: rows are only ever
/// appended, and every formatting call is recorded so it can be inspected.
#[derive(Debug)]
pub struct MemoryWorksheetClient {
    spreadsheet_title: String,
    rows: RwLock<Vec<Vec<CellValue>>>,
    formats: RwLock<Vec<(String, HorizontalAlignment)>>,
    fail_appends: AtomicBool,
}

impl MemoryWorksheetClient {
    /// An empty worksheet in a spreadsheet titled `spreadsheet_title`.
    #[must_use]
    pub fn new(spreadsheet_title: impl Into<String>) -> Self {
        Self {
            spreadsheet_title: spreadsheet_title.into(),
            rows: RwLock::new(Vec::new()),
            formats: RwLock::new(Vec::new()),
            fail_appends: AtomicBool::new(false),
        }
    }

    /// A worksheet whose first row holds the result column headers.
    #[must_use]
    pub fn with_header(spreadsheet_title: impl Into<String>) -> Self {
        let header = COLUMN_HEADERS.iter().map(|h| CellValue::from(*h)).collect();
        Self {
            rows: RwLock::new(vec![header]),
            ..Self::new(spreadsheet_title)
        }
    }

    /// Makes subsequent appends fail with a 503, as an outage would.
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every row, header included.
    pub async fn rows(&self) -> Vec<Vec<CellValue>> {
        self.rows.read().await.clone()
    }

    /// Every `(A1 range, alignment)` formatting call, oldest first.
    pub async fn formatted_ranges(&self) -> Vec<(String, HorizontalAlignment)> {
        self.formats.read().await.clone()
    }
}

fn displayed(row: &[CellValue]) -> Vec<String> {
    row.iter().map(ToString::to_string).collect()
}

impl WorksheetClient for MemoryWorksheetClient {
    fn open_by_name<'a>(&'a self, title: &'a str) -> StoreFuture<'a, Worksheet> {
        Box::pin(async move {
            if title != self.spreadsheet_title {
                return Err(StoreError::SpreadsheetNotFound(title.to_string()));
            }
            Ok(Worksheet {
                spreadsheet_id: format!("memory:{title}"),
                sheet_id: 0,
                title: "Sheet1".to_string(),
                token: AccessToken::new("memory"),
            })
        })
    }

    fn read_all_values<'a>(&'a self, _sheet: &'a Worksheet) -> StoreFuture<'a, Vec<Vec<String>>> {
        Box::pin(async move {
            let rows = self.rows.read().await;
            Ok(rows.iter().map(|row| displayed(row)).collect())
        })
    }

    fn read_header_row<'a>(&'a self, _sheet: &'a Worksheet) -> StoreFuture<'a, Vec<String>> {
        Box::pin(async move {
            let rows = self.rows.read().await;
            Ok(rows.first().map(|row| displayed(row)).unwrap_or_default())
        })
    }

    fn append_row<'a>(&'a self, _sheet: &'a Worksheet, row: &'a [CellValue]) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            if self.fail_appends.load(Ordering::SeqCst) {
                return Err(StoreError::Api {
                    status: 503,
                    message: "worksheet unavailable".to_string(),
                });
            }
            self.rows.write().await.push(row.to_vec());
            Ok(())
        })
    }

    fn format_range<'a>(
        &'a self,
        _sheet: &'a Worksheet,
        range: CellRange,
        alignment: HorizontalAlignment,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.formats.write().await.push((range.to_a1(), alignment));
            Ok(())
        })
    }
}
