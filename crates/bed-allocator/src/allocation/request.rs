use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AssessmentError, ClinicalFlag, Marker, PatientAssessment, Period, SerologyMarkers,
};
use super::facility::{canonicalize, FacilityKey, FacilityNameError};

/// Wire payload accepted from callers before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSubmission {
    #[serde(alias = "hospital")]
    pub facility: String,
    pub date: String,
    pub age: i64,
    pub weight: f64,
    #[serde(alias = "platelet")]
    pub platelet_count: i64,
    pub igg: ClinicalFlag,
    pub igm: ClinicalFlag,
    pub ns1: ClinicalFlag,
    /// Treat the requested facility as full so the fallback search always runs.
    #[serde(default)]
    pub simulate_home_full: bool,
}

/// Validated request handed to the classifier and engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationRequest {
    /// Facility name exactly as submitted.
    pub facility_name: String,
    pub facility: FacilityKey,
    pub date: NaiveDate,
    pub period: Period,
    pub assessment: PatientAssessment,
    pub simulate_home_full: bool,
}

impl AllocationRequest {
    pub fn parse(submission: &AllocationSubmission) -> Result<Self, AllocationRequestError> {
        let date = parse_request_date(&submission.date)?;
        let markers = SerologyMarkers {
            igg: submission.igg.parse(Marker::IgG)?,
            igm: submission.igm.parse(Marker::IgM)?,
            ns1: submission.ns1.parse(Marker::Ns1)?,
        };
        let assessment = PatientAssessment::new(
            submission.age,
            submission.weight,
            submission.platelet_count,
            markers,
        )?;
        let facility = canonicalize(&submission.facility)?;

        Ok(Self {
            facility_name: submission.facility.clone(),
            facility,
            date,
            period: Period::from_date(date),
            assessment,
            simulate_home_full: submission.simulate_home_full,
        })
    }
}

/// Parse a strict `YYYY-MM-DD` admission date.
pub fn parse_request_date(raw: &str) -> Result<NaiveDate, AllocationRequestError> {
    let trimmed = raw.trim();
    let well_formed = trimmed.len() == 10
        && trimmed
            .char_indices()
            .all(|(idx, ch)| if idx == 4 || idx == 7 { ch == '-' } else { ch.is_ascii_digit() });
    if !well_formed {
        return Err(AllocationRequestError::InvalidDateFormat(raw.to_string()));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| AllocationRequestError::InvalidDateFormat(raw.to_string()))
}

/// Request rejected before any capacity lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationRequestError {
    #[error("invalid date '{0}': use YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("invalid assessment: {0}")]
    InvalidAssessment(#[from] AssessmentError),
    #[error("invalid facility name: {0}")]
    InvalidFacilityName(#[from] FacilityNameError),
}

impl AllocationRequestError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDateFormat(_) => "InvalidDateFormat",
            Self::InvalidAssessment(_) => "InvalidAssessment",
            Self::InvalidFacilityName(_) => "InvalidFacilityName",
        }
    }
}
