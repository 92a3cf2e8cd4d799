//! Server-side state of one interactive form.
//!
//! A [`FormSession`] holds the current value of every widget: the personal
//! block shared by all submissions plus one [`BlockForm`] and one
//! [`AthleteRoster`] per [`EventBlock`]. Values are overwritten freely until a
//! block is submitted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::block::{EventBlock, EventName, Role};
use super::roster::AthleteRoster;
use super::SessionId;
use crate::error::SurveyError;

/// Coach details entered once and copied into every submitted row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonalInfo {
    /// Full name of the coach.
    pub coach_name: String,
    /// Sports league the coach belongs to.
    pub league: String,
    /// Identity document number.
    pub identity_document: String,
}

/// Partial update of [`PersonalInfo`]; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PersonalInfoPatch {
    /// New coach name.
    #[serde(default)]
    pub coach_name: Option<String>,
    /// New league.
    #[serde(default)]
    pub league: Option<String>,
    /// New identity document.
    #[serde(default)]
    pub identity_document: Option<String>,
}

impl PersonalInfo {
    /// Applies every field present in `patch`.
    pub fn apply(&mut self, patch: PersonalInfoPatch) {
        if let Some(coach_name) = patch.coach_name {
            self.coach_name = coach_name;
        }
        if let Some(league) = patch.league {
            self.league = league;
        }
        if let Some(identity_document) = patch.identity_document {
            self.identity_document = identity_document;
        }
    }
}

/// Current widget values of one event block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BlockForm {
    /// Selected event.
    pub event: EventName,
    /// Date the event took place.
    pub event_date: NaiveDate,
    /// Where the event took place.
    pub venue: String,
    /// Discipline or test the athletes competed in.
    pub discipline: String,
    /// Coach's role at the event.
    pub role: Role,
    /// Gold medals won.
    pub gold: u32,
    /// Silver medals won.
    pub silver: u32,
    /// Bronze medals won.
    pub bronze: u32,
    /// Number of 4th to 8th place finishes.
    pub rank_4_to_8: u32,
}

/// Partial update of a [`BlockForm`]; absent fields keep their value.
///
/// Counts are unsigned, so a negative number fails deserialization before it
/// reaches the form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BlockFormPatch {
    /// New event; must belong to the block being edited.
    #[serde(default)]
    pub event: Option<EventName>,
    /// New event date (`YYYY-MM-DD`).
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    /// New venue.
    #[serde(default)]
    pub venue: Option<String>,
    /// New discipline.
    #[serde(default)]
    pub discipline: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<Role>,
    /// New gold count.
    #[serde(default)]
    pub gold: Option<u32>,
    /// New silver count.
    #[serde(default)]
    pub silver: Option<u32>,
    /// New bronze count.
    #[serde(default)]
    pub bronze: Option<u32>,
    /// New 4th-8th place count.
    #[serde(default)]
    pub rank_4_to_8: Option<u32>,
}

impl BlockForm {
    /// Default widget values for `block`, dated `today`.
    #[must_use]
    pub const fn new(block: EventBlock, today: NaiveDate) -> Self {
        Self {
            event: block.default_event(),
            event_date: today,
            venue: String::new(),
            discipline: String::new(),
            role: Role::Principal,
            gold: 0,
            silver: 0,
            bronze: 0,
            rank_4_to_8: 0,
        }
    }

    /// Applies every field present in `patch`.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::EventNotInBlock`] if the patch selects an event
    /// offered by a different block. The form is left untouched in that case.
    pub fn apply(&mut self, block: EventBlock, patch: BlockFormPatch) -> Result<(), SurveyError> {
        if let Some(event) = patch.event
            && event.block() != block
        {
            return Err(SurveyError::EventNotInBlock { event, block });
        }

        if let Some(event) = patch.event {
            self.event = event;
        }
        if let Some(event_date) = patch.event_date {
            self.event_date = event_date;
        }
        if let Some(venue) = patch.venue {
            self.venue = venue;
        }
        if let Some(discipline) = patch.discipline {
            self.discipline = discipline;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(gold) = patch.gold {
            self.gold = gold;
        }
        if let Some(silver) = patch.silver {
            self.silver = silver;
        }
        if let Some(bronze) = patch.bronze {
            self.bronze = bronze;
        }
        if let Some(rank_4_to_8) = patch.rank_4_to_8 {
            self.rank_4_to_8 = rank_4_to_8;
        }
        Ok(())
    }
}

/// Widget values plus athlete roster of one event block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    /// Field values.
    pub form: BlockForm,
    /// Athletes accumulated for the next submission.
    pub roster: AthleteRoster,
}

impl BlockState {
    fn new(block: EventBlock, today: NaiveDate) -> Self {
        Self {
            form: BlockForm::new(block, today),
            roster: AthleteRoster::new(),
        }
    }
}

/// Everything one user has entered into the form so far.
#[derive(Debug, Clone)]
pub struct FormSession {
    /// Session identifier.
    pub session_id: SessionId,
    /// Shared coach details.
    pub personal: PersonalInfo,
    /// National events block.
    pub national: BlockState,
    /// Olympic-cycle block.
    pub olympic_cycle: BlockState,
    /// Championship block.
    pub championship: BlockState,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// Last time any value changed.
    pub last_modified_at: DateTime<Utc>,
}

impl FormSession {
    /// Opens a session with default values; date widgets start at `today`.
    #[must_use]
    pub fn new(session_id: SessionId, today: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            personal: PersonalInfo::default(),
            national: BlockState::new(EventBlock::National, today),
            olympic_cycle: BlockState::new(EventBlock::OlympicCycle, today),
            championship: BlockState::new(EventBlock::Championship, today),
            created_at: now,
            last_modified_at: now,
        }
    }

    /// State of `block`.
    #[must_use]
    pub const fn block(&self, block: EventBlock) -> &BlockState {
        match block {
            EventBlock::National => &self.national,
            EventBlock::OlympicCycle => &self.olympic_cycle,
            EventBlock::Championship => &self.championship,
        }
    }

    /// Mutable state of `block`. Callers [`touch`](Self::touch) once a
    /// change has actually been made.
    pub fn block_mut(&mut self, block: EventBlock) -> &mut BlockState {
        match block {
            EventBlock::National => &mut self.national,
            EventBlock::OlympicCycle => &mut self.olympic_cycle,
            EventBlock::Championship => &mut self.championship,
        }
    }

    /// Records that the session changed.
    pub fn touch(&mut self) {
        self.last_modified_at = Utc::now();
    }
}
