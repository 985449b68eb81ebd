use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Laboratory and demographic inputs for one allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientAssessment {
    pub age: u32,
    pub weight_kg: f64,
    pub platelet_count: u32,
    pub igg_positive: bool,
    pub igm_positive: bool,
    pub ns1_positive: bool,
}

impl PatientAssessment {
    /// Validate raw clinical inputs into an assessment.
    pub fn new(
        age: i64,
        weight_kg: f64,
        platelet_count: i64,
        markers: SerologyMarkers,
    ) -> Result<Self, AssessmentError> {
        let age = u32::try_from(age).map_err(|_| AssessmentError::Age(age))?;
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(AssessmentError::Weight(weight_kg));
        }
        let platelet_count = u32::try_from(platelet_count)
            .map_err(|_| AssessmentError::PlateletCount(platelet_count))?;

        Ok(Self {
            age,
            weight_kg,
            platelet_count,
            igg_positive: markers.igg,
            igm_positive: markers.igm,
            ns1_positive: markers.ns1,
        })
    }
}

/// Normalized serology results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerologyMarkers {
    pub igg: bool,
    pub igm: bool,
    pub ns1: bool,
}

/// Serology marker names, used for parse diagnostics and score trails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    IgG,
    IgM,
    Ns1,
}

impl Marker {
    pub const fn label(self) -> &'static str {
        match self {
            Self::IgG => "IgG",
            Self::IgM => "IgM",
            Self::Ns1 => "NS1",
        }
    }
}

/// Marker value as it arrives over the wire: boolean, 0/1, or a Positive/Negative label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClinicalFlag {
    Boolean(bool),
    Integer(i64),
    Label(String),
}

impl ClinicalFlag {
    pub fn parse(&self, marker: Marker) -> Result<bool, AssessmentError> {
        let unrecognized = || AssessmentError::UnrecognizedMarker {
            marker: marker.label(),
            value: self.to_string(),
        };

        match self {
            Self::Boolean(value) => Ok(*value),
            Self::Integer(0) => Ok(false),
            Self::Integer(1) => Ok(true),
            Self::Integer(_) => Err(unrecognized()),
            Self::Label(label) => match label.trim().to_ascii_lowercase().as_str() {
                "positive" | "pos" | "yes" | "true" | "1" => Ok(true),
                "negative" | "neg" | "no" | "false" | "0" => Ok(false),
                _ => Err(unrecognized()),
            },
        }
    }
}

impl From<bool> for ClinicalFlag {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl fmt::Display for ClinicalFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Label(value) => f.write_str(value),
        }
    }
}

/// Out-of-domain clinical inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error("age must be a non-negative whole number of years (got {0})")]
    Age(i64),
    #[error("weight must be a positive number of kilograms (got {0})")]
    Weight(f64),
    #[error("platelet count must be non-negative (got {0})")]
    PlateletCount(i64),
    #[error("{marker} result '{value}' is not Positive/Negative, 0/1 or true/false")]
    UnrecognizedMarker { marker: &'static str, value: String },
}

/// Ordinal triage category, ordered by escalating severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityVerdict {
    Mild,
    Moderate,
    Severe,
    VerySevere,
}

impl SeverityVerdict {
    pub const fn ordered() -> [Self; 4] {
        [Self::Mild, Self::Moderate, Self::Severe, Self::VerySevere]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::VerySevere => "VerySevere",
        }
    }
}

impl fmt::Display for SeverityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Forecast month a request is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Build a period, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
