use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::SeverityVerdict;

/// Class of hospital resource implied by a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceRequirement {
    #[serde(rename = "General Bed")]
    GeneralBed,
    #[serde(rename = "ICU")]
    IcuBed,
}

impl ResourceRequirement {
    pub const fn for_verdict(verdict: SeverityVerdict) -> Self {
        match verdict {
            SeverityVerdict::Severe | SeverityVerdict::VerySevere => Self::IcuBed,
            SeverityVerdict::Mild | SeverityVerdict::Moderate => Self::GeneralBed,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GeneralBed => "General Bed",
            Self::IcuBed => "ICU",
        }
    }

    /// Snapshot fields holding the occupied and total counts for this resource.
    pub const fn capacity_fields(self) -> CapacityFields {
        match self {
            Self::GeneralBed => CapacityFields {
                occupied: CapacityField::BedsOccupied,
                total: CapacityField::BedsTotal,
            },
            Self::IcuBed => CapacityFields {
                occupied: CapacityField::IcuOccupied,
                total: CapacityField::IcuTotal,
            },
        }
    }
}

impl fmt::Display for ResourceRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Individual count carried by a capacity snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityField {
    BedsTotal,
    BedsOccupied,
    IcuTotal,
    IcuOccupied,
}

impl CapacityField {
    /// Column header used by the forecast export.
    pub const fn column(self) -> &'static str {
        match self {
            Self::BedsTotal => "Beds Total",
            Self::BedsOccupied => "Beds Occupied",
            Self::IcuTotal => "ICU Beds Total",
            Self::IcuOccupied => "ICU Beds Occupied",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityFields {
    pub occupied: CapacityField,
    pub total: CapacityField,
}
