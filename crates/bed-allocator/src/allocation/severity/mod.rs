mod config;
mod policy;
mod rules;

pub use config::{SeverityPolicy, UnknownSeverityPolicy};

use super::domain::{PatientAssessment, SeverityVerdict};
use serde::{Deserialize, Serialize};

/// Stateless classifier applying the selected policy to an assessment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityClassifier {
    policy: SeverityPolicy,
}

impl SeverityClassifier {
    pub fn new(policy: SeverityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SeverityPolicy {
        self.policy
    }

    pub fn classify(&self, assessment: &PatientAssessment) -> SeverityAssessment {
        match self.policy {
            SeverityPolicy::Weighted => {
                let (components, score) = rules::score_assessment(assessment);
                SeverityAssessment {
                    verdict: policy::verdict_for_score(score),
                    score: Some(score),
                    components,
                }
            }
            SeverityPolicy::Threshold => {
                let (components, verdict) = rules::threshold_assessment(assessment);
                SeverityAssessment {
                    verdict,
                    score: None,
                    components,
                }
            }
        }
    }
}

/// Weighted severity score, held in half-point units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeverityScore(u16);

impl SeverityScore {
    pub const fn from_half_points(half_points: u16) -> Self {
        Self(half_points)
    }

    pub const fn half_points(self) -> u16 {
        self.0
    }

    pub fn value(self) -> f32 {
        f32::from(self.0) / 2.0
    }
}

impl Serialize for SeverityScore {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.value())
    }
}

/// Clinical factor contributing to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityFactor {
    Ns1,
    IgM,
    IgG,
    PediatricAge,
    PlateletCount,
    Serology,
}

/// Discrete contribution to a verdict, kept for audit output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub factor: SeverityFactor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f32>,
    pub notes: String,
}

/// Classifier output: the verdict plus the trail that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityAssessment {
    pub verdict: SeverityVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<SeverityScore>,
    pub components: Vec<ScoreComponent>,
}
