use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::allocation::{
    AllocationDataset, AllocationEngine, AllocationRequest, AllocationResult, AllocationService,
    AllocationSubmission, CapacitySnapshotSet, ClinicalFlag, DatasetLoader, DistanceGraph,
    FacilityCapacitySnapshot, FacilityRegistry, Period, SeverityClassifier, SeverityPolicy,
};

pub(super) const MUGDA: &str = "Mugda General Hospital";
pub(super) const DMCH: &str = "Dhaka Medical College Hospital";
pub(super) const KURMITOLA: &str = "Kurmitola General Hospital";
pub(super) const SUHRAWARDY: &str = "Shaheed Suhrawardy Hospital";
pub(super) const GHOST: &str = "Ghost Clinic";

pub(super) fn july() -> Period {
    Period::new(2026, 7).expect("valid period")
}

fn snapshot(beds: (f64, f64), icu: (f64, f64)) -> FacilityCapacitySnapshot {
    FacilityCapacitySnapshot {
        beds_total: beds.0,
        beds_occupied: beds.1,
        icu_total: icu.0,
        icu_occupied: icu.1,
    }
}

/// July 2026 forecast around Mugda:
///
/// | facility   | beds     | icu   | origin |
/// |------------|----------|-------|--------|
/// | Mugda      | 500/480  | 20/20 | yes    |
/// | DMCH       | 800/800  | 30/X  | yes    |
/// | Kurmitola  | 400/300  | 15/15 | no     |
/// | Suhrawardy | 300/290  | 12/11 | no     |
/// | Ghost      | no forecast       | no     |
pub(super) fn dataset(dmch_icu_occupied: f64) -> AllocationDataset {
    let mut registry = FacilityRegistry::new();
    let mugda = registry.register(MUGDA).expect("name");
    let dmch = registry.register(DMCH).expect("name");
    let kurmitola = registry.register(KURMITOLA).expect("name");
    let suhrawardy = registry.register(SUHRAWARDY).expect("name");
    let ghost = registry.register(GHOST).expect("name");

    let mut capacity = CapacitySnapshotSet::new();
    for (key, values) in [
        (&mugda, snapshot((500.0, 480.0), (20.0, 20.0))),
        (&dmch, snapshot((800.0, 800.0), (30.0, dmch_icu_occupied))),
        (&kurmitola, snapshot((400.0, 300.0), (15.0, 15.0))),
        (&suhrawardy, snapshot((300.0, 290.0), (12.0, 11.0))),
    ] {
        capacity.insert(key.clone(), july(), values).expect("unique");
    }

    let mut distances = DistanceGraph::new();
    distances.insert(mugda.clone(), mugda.clone(), 0.0);
    distances.insert(mugda.clone(), ghost.clone(), 1.0);
    distances.insert(mugda.clone(), dmch.clone(), 3.2);
    distances.insert(mugda.clone(), kurmitola.clone(), 5.75);
    distances.insert(mugda.clone(), suhrawardy, 8.4);
    distances.insert(dmch.clone(), mugda, 3.0);
    distances.insert(dmch.clone(), dmch.clone(), 0.0);
    distances.insert(dmch, kurmitola, 4.0);

    AllocationDataset::new(registry, capacity, distances)
}

pub(super) fn submission(facility: &str) -> AllocationSubmission {
    AllocationSubmission {
        facility: facility.to_string(),
        date: "2026-07-15".to_string(),
        age: 30,
        weight: 62.0,
        platelet_count: 160_000,
        igg: ClinicalFlag::Integer(0),
        igm: ClinicalFlag::Integer(0),
        ns1: ClinicalFlag::Integer(0),
        simulate_home_full: false,
    }
}

/// Pediatric, critical platelets, triple positive: 6.5 points.
pub(super) fn critical_submission(facility: &str) -> AllocationSubmission {
    AllocationSubmission {
        age: 10,
        weight: 28.0,
        platelet_count: 40_000,
        igg: ClinicalFlag::Integer(1),
        igm: ClinicalFlag::Integer(1),
        ns1: ClinicalFlag::Integer(1),
        ..submission(facility)
    }
}

pub(super) fn allocate_with(
    dataset: &AllocationDataset,
    submission: &AllocationSubmission,
) -> AllocationResult {
    let request = AllocationRequest::parse(submission).expect("valid request");
    let verdict = SeverityClassifier::new(SeverityPolicy::Weighted)
        .classify(&request.assessment)
        .verdict;
    AllocationEngine::new(&dataset.registry, &dataset.capacity, &dataset.distances)
        .allocate(&request, verdict)
}

/// In-memory loader whose DMCH ICU occupancy can be changed between refreshes.
#[derive(Debug)]
pub(super) struct FixtureLoader {
    dmch_icu_occupied: Mutex<f64>,
}

impl FixtureLoader {
    pub(super) fn new(dmch_icu_occupied: f64) -> Self {
        Self {
            dmch_icu_occupied: Mutex::new(dmch_icu_occupied),
        }
    }

    pub(super) fn set_dmch_icu_occupied(&self, value: f64) {
        *self.dmch_icu_occupied.lock().expect("fixture mutex poisoned") = value;
    }
}

impl DatasetLoader for FixtureLoader {
    type Error = Infallible;

    fn load(&self) -> Result<AllocationDataset, Self::Error> {
        let occupied = *self.dmch_icu_occupied.lock().expect("fixture mutex poisoned");
        Ok(dataset(occupied))
    }
}

#[derive(Debug, Default)]
pub(super) struct FailingLoader;

impl DatasetLoader for FailingLoader {
    type Error = std::io::Error;

    fn load(&self) -> Result<AllocationDataset, Self::Error> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "forecast export missing",
        ))
    }
}

pub(super) fn loaded_service(policy: SeverityPolicy) -> Arc<AllocationService<FixtureLoader>> {
    let service = AllocationService::new(Arc::new(FixtureLoader::new(25.0)), policy);
    service.refresh().expect("fixture loads");
    Arc::new(service)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
