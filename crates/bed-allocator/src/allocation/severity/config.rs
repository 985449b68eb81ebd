use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named selection of the severity rubric applied to every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityPolicy {
    /// Weighted serology/age/platelet score.
    #[default]
    Weighted,
    /// Platelet thresholds plus the triple-positive serology rule.
    Threshold,
}

impl SeverityPolicy {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weighted => "weighted",
            Self::Threshold => "threshold",
        }
    }
}

impl fmt::Display for SeverityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity policy '{0}' (expected 'weighted' or 'threshold')")]
pub struct UnknownSeverityPolicy(pub String);

impl FromStr for SeverityPolicy {
    type Err = UnknownSeverityPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weighted" | "score" => Ok(Self::Weighted),
            "threshold" | "rules" => Ok(Self::Threshold),
            other => Err(UnknownSeverityPolicy(other.to_string())),
        }
    }
}
