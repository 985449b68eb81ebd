use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::capacity::CapacitySnapshotProvider;
use super::distance::DistanceGraphProvider;
use super::domain::SeverityVerdict;
use super::facility::FacilityRegistry;
use super::request::AllocationRequest;
use super::resource::ResourceRequirement;

/// Terminal state of one allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AllocationOutcome {
    HomeUnknown,
    AssignedHome,
    DistanceUnknown,
    AssignedFallback,
    Unassigned,
}

impl AllocationOutcome {
    pub fn note(self, resource: ResourceRequirement) -> String {
        match self {
            Self::HomeUnknown => {
                "Facility not found in forecast for the requested period".to_string()
            }
            Self::AssignedHome => "Assigned at selected facility".to_string(),
            Self::DistanceUnknown => "Facility not found in distance data".to_string(),
            Self::AssignedFallback => format!(
                "Redirected to nearest facility with available {}",
                resource.label()
            ),
            Self::Unassigned => format!("No nearby facility has available {}", resource.label()),
        }
    }

    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::AssignedHome | Self::AssignedFallback)
    }
}

/// Whether the requested facility itself could take the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CurrentAvailability {
    Yes,
    No,
    Unknown,
}

/// Allocation decision, serialized with the presentation field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Verdict")]
    pub verdict: SeverityVerdict,
    #[serde(rename = "Resource Needed")]
    pub resource: ResourceRequirement,
    #[serde(rename = "Hospital Tried")]
    pub tried_facility: String,
    #[serde(rename = "Available at Current Hospital")]
    pub available_at_current: CurrentAvailability,
    #[serde(rename = "Assigned Hospital")]
    pub assigned_facility: Option<String>,
    /// Full-precision fallback distance; `None` unless redirected.
    #[serde(
        rename = "Distance (KM)",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_rounded_km"
    )]
    pub distance_km: Option<f64>,
    #[serde(rename = "Note")]
    pub note: String,
    #[serde(rename = "Outcome")]
    pub outcome: AllocationOutcome,
}

impl AllocationResult {
    /// Travel distance to the assigned facility; zero when assigned at home.
    pub fn travel_distance_km(&self) -> Option<f64> {
        match self.outcome {
            AllocationOutcome::AssignedHome => Some(0.0),
            _ => self.distance_km,
        }
    }
}

fn serialize_rounded_km<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(km) => serializer.serialize_some(&round_km(*km)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Greedy nearest-facility allocator over one borrowed dataset generation.
pub struct AllocationEngine<'a, C: ?Sized, D: ?Sized> {
    registry: &'a FacilityRegistry,
    capacity: &'a C,
    distances: &'a D,
}

impl<'a, C, D> AllocationEngine<'a, C, D>
where
    C: CapacitySnapshotProvider + ?Sized,
    D: DistanceGraphProvider + ?Sized,
{
    pub fn new(registry: &'a FacilityRegistry, capacity: &'a C, distances: &'a D) -> Self {
        Self {
            registry,
            capacity,
            distances,
        }
    }

    pub fn allocate(&self, request: &AllocationRequest, verdict: SeverityVerdict) -> AllocationResult {
        let resource = ResourceRequirement::for_verdict(verdict);
        let conclude = |outcome: AllocationOutcome,
                        available_at_current: CurrentAvailability,
                        assigned_facility: Option<String>,
                        distance_km: Option<f64>| AllocationResult {
            date: request.date,
            verdict,
            resource,
            tried_facility: request.facility_name.clone(),
            available_at_current,
            assigned_facility,
            distance_km,
            note: outcome.note(resource),
            outcome,
        };

        let home = &request.facility;
        let period = request.period;

        let Some(mut home_snapshot) = self.capacity.lookup(home, period) else {
            return conclude(
                AllocationOutcome::HomeUnknown,
                CurrentAvailability::Unknown,
                None,
                None,
            );
        };
        if request.simulate_home_full {
            home_snapshot = home_snapshot.saturated(resource);
        }

        if home_snapshot.has_room(resource) {
            return conclude(
                AllocationOutcome::AssignedHome,
                CurrentAvailability::Yes,
                Some(self.registry.display_name(home).to_string()),
                None,
            );
        }

        let neighbors = match self.distances.neighbors_sorted_by_distance(home) {
            Ok(neighbors) => neighbors,
            Err(_) => {
                return conclude(
                    AllocationOutcome::DistanceUnknown,
                    CurrentAvailability::No,
                    None,
                    None,
                )
            }
        };

        for neighbor in neighbors.iter().filter(|neighbor| &neighbor.facility != home) {
            let Some(snapshot) = self.capacity.lookup(&neighbor.facility, period) else {
                debug!(candidate = %neighbor.facility, %period, "skipping candidate without forecast");
                continue;
            };

            if snapshot.has_room(resource) {
                return conclude(
                    AllocationOutcome::AssignedFallback,
                    CurrentAvailability::No,
                    Some(self.registry.display_name(&neighbor.facility).to_string()),
                    Some(neighbor.distance_km),
                );
            }
            debug!(candidate = %neighbor.facility, %resource, "candidate at capacity");
        }

        conclude(
            AllocationOutcome::Unassigned,
            CurrentAvailability::No,
            None,
            None,
        )
    }
}
