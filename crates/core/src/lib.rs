//! # Wardbook Core
//!
//! Core business logic for the Wardbook hospital record service.
//!
//! This crate contains the domain types and the record store adapter:
//! - Patient record row, creation payload, and update patch types
//! - The pooled adapter over the relational `hospital` table
//! - The error taxonomy shared with the API layer
//!
//! **No API concerns**: HTTP routing, response envelopes, and OpenAPI docs
//! belong in `api-rest`.

pub mod error;
pub mod record;
pub mod store;

pub use error::{RecordError, RecordResult};
pub use record::{parse_date, NewRecord, PatientRecord, RecordField, RecordPatch};
pub use store::RecordStore;
