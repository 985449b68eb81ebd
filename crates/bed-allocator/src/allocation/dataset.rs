use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::capacity::CapacitySnapshotSet;
use super::distance::DistanceGraph;
use super::domain::Period;
use super::facility::FacilityRegistry;

/// One consistent generation of forecast capacity, distances and facility names.
#[derive(Debug, Default)]
pub struct AllocationDataset {
    pub registry: FacilityRegistry,
    pub capacity: CapacitySnapshotSet,
    pub distances: DistanceGraph,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
}

impl AllocationDataset {
    pub fn new(
        registry: FacilityRegistry,
        capacity: CapacitySnapshotSet,
        distances: DistanceGraph,
    ) -> Self {
        Self {
            registry,
            capacity,
            distances,
            generation: 0,
            loaded_at: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn summary(&self) -> DatasetSummary {
        let periods = self.capacity.periods();
        DatasetSummary {
            generation: self.generation,
            loaded_at: self.loaded_at,
            facilities: self.registry.len(),
            snapshots: self.capacity.len(),
            distance_origins: self.distances.origin_count(),
            distance_edges: self.distances.edge_count(),
            first_period: periods.first().copied(),
            last_period: periods.last().copied(),
        }
    }
}

/// Counts describing a loaded dataset generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    pub facilities: usize,
    pub snapshots: usize,
    pub distance_origins: usize,
    pub distance_edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_period: Option<Period>,
}

/// Producer of complete dataset generations (CSV exports, fixtures, ...).
pub trait DatasetLoader: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<AllocationDataset, Self::Error>;
}

/// Holder of the current dataset generation.
///
/// Readers clone the `Arc` and keep that generation for the whole request; refreshes
/// replace the whole dataset and never patch it in place.
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Arc<AllocationDataset>>,
}

impl DatasetStore {
    pub fn new(dataset: AllocationDataset) -> Self {
        let store = Self::default();
        store.replace(dataset);
        store
    }

    pub fn current(&self) -> Arc<AllocationDataset> {
        // the guarded value is an immutable Arc, so a poisoned lock is still consistent
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new generation, returning its summary.
    pub fn replace(&self, mut dataset: AllocationDataset) -> DatasetSummary {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        dataset.generation = guard.generation + 1;
        dataset.loaded_at = Some(Utc::now());
        let summary = dataset.summary();
        *guard = Arc::new(dataset);
        summary
    }
}
