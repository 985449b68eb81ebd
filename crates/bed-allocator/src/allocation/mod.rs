//! Severity triage and bed/ICU allocation against monthly capacity forecasts.
//!
//! A request flows through the severity classifier and resource resolver, then the
//! engine checks the requested facility's forecast and, when it is full, walks the
//! distance graph for the nearest facility with room.

pub mod capacity;
pub mod dataset;
pub mod distance;
pub mod domain;
pub mod engine;
pub mod facility;
pub mod request;
pub mod resource;
pub mod router;
pub mod service;
pub mod severity;

#[cfg(test)]
mod tests;

pub use capacity::{
    CapacityError, CapacitySnapshotProvider, CapacitySnapshotSet, FacilityCapacitySnapshot,
};
pub use dataset::{AllocationDataset, DatasetLoader, DatasetStore, DatasetSummary};
pub use distance::{DistanceGraph, DistanceGraphProvider, Neighbor, UnknownFacility};
pub use domain::{
    AssessmentError, ClinicalFlag, Marker, PatientAssessment, Period, SerologyMarkers,
    SeverityVerdict,
};
pub use engine::{AllocationEngine, AllocationOutcome, AllocationResult, CurrentAvailability};
pub use facility::{canonicalize, FacilityKey, FacilityNameError, FacilityRegistry};
pub use request::{
    parse_request_date, AllocationRequest, AllocationRequestError, AllocationSubmission,
};
pub use resource::{CapacityField, CapacityFields, ResourceRequirement};
pub use router::allocation_router;
pub use service::{AllocationService, AllocationServiceError, FacilityView};
pub use severity::{
    ScoreComponent, SeverityAssessment, SeverityClassifier, SeverityFactor, SeverityPolicy,
    SeverityScore, UnknownSeverityPolicy,
};
