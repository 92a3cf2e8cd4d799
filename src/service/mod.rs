//! Service layer: business logic orchestration.
//!
//! [`SurveyService`] applies user actions to form sessions and hands
//! submitted blocks to the [`crate::store::StoreAdapter`].

pub mod survey_service;

pub use survey_service::{Submission, SurveyService};
