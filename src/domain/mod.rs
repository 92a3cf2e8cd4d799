//! Domain layer: form blocks, session state, athlete rosters, and the
//! normalized result record.
//!
//! Everything here is transport-agnostic. The API layer maps requests onto
//! these types and the store layer only ever sees a [`ResultRecord`].

pub mod block;
pub mod form_schema;
pub mod form_session;
pub mod result_record;
pub mod roster;
pub mod session_id;
pub mod session_registry;

pub use block::{EventBlock, EventName, Role};
pub use form_schema::FormSchema;
pub use form_session::{
    BlockForm, BlockFormPatch, BlockState, FormSession, PersonalInfo, PersonalInfoPatch,
};
pub use result_record::{COLUMN_COUNT, COLUMN_HEADERS, CellValue, ResultRecord, normalize};
pub use roster::{AthleteRoster, RosterOutcome};
pub use session_id::SessionId;
pub use session_registry::SessionRegistry;
