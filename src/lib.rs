//! # coach-results
//!
//! Form service that collects the sports-event results of coaches and
//! appends each submission as a row of a shared Google Sheets spreadsheet.
//!
//! A client opens a form session, fills in the coach details once and then
//! one of three event blocks (national, olympic cycle, championship): event,
//! date, venue, discipline, role, medal counts and a growing list of
//! athletes. Submitting a block normalizes it into a fixed 14-column
//! [`domain::ResultRecord`] and appends it to the sheet.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── SurveyService (service/)
//!     │
//!     ├── SessionRegistry, AthleteRoster, normalize (domain/)
//!     │
//!     └── StoreAdapter (store/)
//!             ├── GoogleSheetsClient (Sheets v4 + Drive v3)
//!             └── MemoryWorksheetClient
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
