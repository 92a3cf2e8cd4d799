//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies for partial updates reuse the domain patch types
//! ([`crate::domain::PersonalInfoPatch`], [`crate::domain::BlockFormPatch`]).

pub mod block_dto;
pub mod session_dto;

pub use block_dto::*;
pub use session_dto::*;
