use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::dataset::{AllocationDataset, DatasetLoader, DatasetStore, DatasetSummary};
use super::engine::{AllocationEngine, AllocationResult};
use super::facility::FacilityKey;
use super::request::{AllocationRequest, AllocationRequestError, AllocationSubmission};
use super::severity::{SeverityAssessment, SeverityClassifier, SeverityPolicy};

/// Service composing the dataset store, severity classifier and allocation engine.
pub struct AllocationService<L> {
    loader: Arc<L>,
    store: Arc<DatasetStore>,
    classifier: SeverityClassifier,
}

impl<L> AllocationService<L>
where
    L: DatasetLoader + 'static,
{
    /// Build a service with an empty dataset; call [`refresh`](Self::refresh) to load one.
    pub fn new(loader: Arc<L>, policy: SeverityPolicy) -> Self {
        Self::with_store(loader, Arc::new(DatasetStore::default()), policy)
    }

    pub fn with_store(loader: Arc<L>, store: Arc<DatasetStore>, policy: SeverityPolicy) -> Self {
        Self {
            loader,
            store,
            classifier: SeverityClassifier::new(policy),
        }
    }

    pub fn policy(&self) -> SeverityPolicy {
        self.classifier.policy()
    }

    /// Load a fresh dataset generation and swap it in.
    ///
    /// On failure the previous generation stays in place.
    pub fn refresh(&self) -> Result<DatasetSummary, AllocationServiceError> {
        let dataset = self.loader.load().map_err(|err| {
            warn!(error = %err, "dataset refresh failed; keeping current generation");
            AllocationServiceError::Load(Box::new(err))
        })?;
        let summary = self.store.replace(dataset);
        info!(
            generation = summary.generation,
            facilities = summary.facilities,
            snapshots = summary.snapshots,
            distance_edges = summary.distance_edges,
            "forecast dataset loaded"
        );
        Ok(summary)
    }

    pub fn dataset(&self) -> Arc<AllocationDataset> {
        self.store.current()
    }

    pub fn classify(
        &self,
        submission: &AllocationSubmission,
    ) -> Result<SeverityAssessment, AllocationRequestError> {
        let request = AllocationRequest::parse(submission)?;
        Ok(self.classifier.classify(&request.assessment))
    }

    /// Validate, classify and allocate one patient against the current generation.
    pub fn allocate(
        &self,
        submission: &AllocationSubmission,
    ) -> Result<AllocationResult, AllocationRequestError> {
        let request = AllocationRequest::parse(submission)?;
        let severity = self.classifier.classify(&request.assessment);

        let dataset = self.store.current();
        let engine = AllocationEngine::new(&dataset.registry, &dataset.capacity, &dataset.distances);
        let result = engine.allocate(&request, severity.verdict);

        info!(
            generation = dataset.generation(),
            facility = %request.facility,
            period = %request.period,
            verdict = %result.verdict,
            resource = %result.resource,
            outcome = ?result.outcome,
            assigned = result.assigned_facility.as_deref().unwrap_or("-"),
            "allocation decided"
        );

        Ok(result)
    }

    /// Facilities known to the current generation, ordered by canonical key.
    pub fn facilities(&self) -> Vec<FacilityView> {
        let dataset = self.store.current();
        dataset
            .registry
            .iter()
            .map(|(key, name)| FacilityView {
                key: key.clone(),
                name: name.to_string(),
                in_distance_graph: dataset.distances.contains_origin(key),
            })
            .collect()
    }
}

/// Facility listing entry for pickers and API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilityView {
    pub key: FacilityKey,
    pub name: String,
    pub in_distance_graph: bool,
}

/// Error raised by the allocation service outside request validation.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error("failed to load forecast dataset: {0}")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync>),
}
