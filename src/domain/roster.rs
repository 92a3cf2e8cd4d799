//! Per-block accumulator of athlete names.
//!
//! Coaches add athletes one at a time before submitting a block. The list
//! lives only as long as the form session; it is emptied on an explicit
//! clear or after the block is successfully submitted.

use serde::Serialize;
use utoipa::ToSchema;

/// Separator used when the roster is flattened into a single cell.
pub const NAME_SEPARATOR: &str = ", ";

/// Warning reported when a blank name is offered.
pub const BLANK_NAME_WARNING: &str = "Please enter a valid athlete name.";

/// Result of offering a name to an [`AthleteRoster`].
///
/// A blank name is not an error: it is reported back to the user while the
/// roster stays unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RosterOutcome {
    /// The trimmed name was appended.
    Added {
        /// Name as stored, after trimming.
        name: String,
        /// 1-based position in the roster.
        position: usize,
    },
    /// The name was empty or whitespace only; nothing changed.
    Rejected {
        /// User-facing warning.
        warning: String,
    },
}

/// Ordered list of athlete names for one block of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AthleteRoster {
    names: Vec<String>,
}

impl AthleteRoster {
    /// Creates an empty roster.
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Appends `name` after trimming it. Blank input is rejected without
    /// touching the roster.
    pub fn add(&mut self, name: &str) -> RosterOutcome {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return RosterOutcome::Rejected {
                warning: BLANK_NAME_WARNING.to_string(),
            };
        }
        self.names.push(trimmed.to_string());
        RosterOutcome::Added {
            name: trimmed.to_string(),
            position: self.names.len(),
        }
    }

    /// Removes every name.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Names in insertion order.
    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.names
    }

    /// Names joined into the single-cell form written to the sheet.
    #[must_use]
    pub fn joined(&self) -> String {
        self.names.join(NAME_SEPARATOR)
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no names were added since the last clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
