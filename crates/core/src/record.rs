//! Patient record types.
//!
//! This module defines the row type stored in the `hospital` table together
//! with the validated payload types the handler layer builds before touching
//! the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{RecordError, RecordResult};

/// One patient entry in the `hospital` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct PatientRecord {
    /// Store-assigned serial number. Immutable, never reused.
    pub sno: i64,
    pub patient_name: String,
    pub admission: NaiveDate,
    pub treatments: Option<String>,
    pub discharge: NaiveDate,
    pub ordered_tests: Option<String>,
    pub test_results: Option<String>,
    pub prescription: Option<String>,
    pub payment_status: Option<String>,
}

/// The columns a single update call may target.
///
/// UPDATE statements derive their column name exclusively from this closed
/// enum, so request data never reaches the SQL text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    PatientName,
    Admission,
    Treatments,
    Discharge,
    OrderedTests,
    TestResults,
    Prescription,
    PaymentStatus,
}

impl RecordField {
    pub fn column(self) -> &'static str {
        match self {
            RecordField::PatientName => "patient_name",
            RecordField::Admission => "admission",
            RecordField::Treatments => "treatments",
            RecordField::Discharge => "discharge",
            RecordField::OrderedTests => "ordered_tests",
            RecordField::TestResults => "test_results",
            RecordField::Prescription => "prescription",
            RecordField::PaymentStatus => "payment_status",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, RecordField::Admission | RecordField::Discharge)
    }
}

/// A validated creation payload.
///
/// Construction is the validation boundary: a `NewRecord` always carries a
/// non-blank name and well-formed admission/discharge dates.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub patient_name: String,
    pub admission: NaiveDate,
    pub treatments: Option<String>,
    pub discharge: NaiveDate,
}

impl NewRecord {
    /// Validate raw request fields into a `NewRecord`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidInput` if the patient name is blank or
    /// either date fails to parse as `YYYY-MM-DD`.
    pub fn new(
        patient_name: String,
        admission: &str,
        treatments: Option<String>,
        discharge: &str,
    ) -> RecordResult<Self> {
        let patient_name = patient_name.trim().to_string();
        if patient_name.is_empty() {
            return Err(RecordError::InvalidInput(
                "patient name cannot be empty".into(),
            ));
        }

        Ok(Self {
            patient_name,
            admission: parse_date(admission)?,
            treatments,
            discharge: parse_date(discharge)?,
        })
    }
}

/// The PUT /patients/{id} body: every recognised key optional.
///
/// The update contract is first-matching-key-wins: keys are checked in the
/// fixed priority order name, admission, treatments, discharge, and only the
/// first key present is applied. A client supplying both `admission` and
/// `treatments` only sees `admission` applied. Absent and blank values both
/// count as "not present" and fall through to the next key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge: Option<String>,
}

impl RecordPatch {
    /// Resolve the single field this patch applies, validating date-typed
    /// values. `Ok(None)` means no recognised key carried a value; the
    /// caller performs no mutation in that case.
    pub fn first_change(&self) -> RecordResult<Option<(RecordField, String)>> {
        let candidates = [
            (RecordField::PatientName, &self.patient),
            (RecordField::Admission, &self.admission),
            (RecordField::Treatments, &self.treatments),
            (RecordField::Discharge, &self.discharge),
        ];

        for (field, value) in candidates {
            let Some(value) = value else { continue };
            if value.trim().is_empty() {
                continue;
            }

            let value = if field.is_date() {
                // Normalise to the canonical YYYY-MM-DD text form.
                parse_date(value)?.to_string()
            } else {
                value.clone()
            };

            return Ok(Some((field, value)));
        }

        Ok(None)
    }
}

/// Parse a `YYYY-MM-DD` date string.
///
/// # Errors
///
/// Returns `RecordError::InvalidInput` if the value is not a valid date.
pub fn parse_date(value: &str) -> RecordResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        RecordError::InvalidInput(format!("invalid date '{value}' (expected YYYY-MM-DD)"))
    })
}
