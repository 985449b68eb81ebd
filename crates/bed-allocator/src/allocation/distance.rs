use std::collections::HashMap;

use serde::Serialize;

use super::facility::FacilityKey;

/// Candidate facility reachable from an origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub facility: FacilityKey,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("facility '{0}' has no entry in the distance graph")]
pub struct UnknownFacility(pub FacilityKey);

/// Directed distance lookups keyed by the requesting facility.
pub trait DistanceGraphProvider: Send + Sync {
    /// Neighbors of `origin` by ascending distance; equal distances keep insertion order.
    fn neighbors_sorted_by_distance(
        &self,
        origin: &FacilityKey,
    ) -> Result<Vec<Neighbor>, UnknownFacility>;
}

/// Directed distance graph. `dist(a, b)` and `dist(b, a)` are stored independently.
#[derive(Debug, Clone, Default)]
pub struct DistanceGraph {
    edges: HashMap<FacilityKey, Vec<Neighbor>>,
}

impl DistanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an origin even when it has no usable edges.
    pub fn add_origin(&mut self, origin: FacilityKey) {
        self.edges.entry(origin).or_default();
    }

    /// Record `origin -> candidate`. Returns false when the pair was already present or
    /// the distance is not a finite non-negative number.
    pub fn insert(&mut self, origin: FacilityKey, candidate: FacilityKey, distance_km: f64) -> bool {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return false;
        }

        let neighbors = self.edges.entry(origin).or_default();
        if neighbors.iter().any(|neighbor| neighbor.facility == candidate) {
            return false;
        }
        neighbors.push(Neighbor {
            facility: candidate,
            distance_km,
        });
        true
    }

    pub fn distance(&self, origin: &FacilityKey, candidate: &FacilityKey) -> Option<f64> {
        self.edges.get(origin).and_then(|neighbors| {
            neighbors
                .iter()
                .find(|neighbor| &neighbor.facility == candidate)
                .map(|neighbor| neighbor.distance_km)
        })
    }

    pub fn contains_origin(&self, origin: &FacilityKey) -> bool {
        self.edges.contains_key(origin)
    }

    pub fn origin_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

impl DistanceGraphProvider for DistanceGraph {
    fn neighbors_sorted_by_distance(
        &self,
        origin: &FacilityKey,
    ) -> Result<Vec<Neighbor>, UnknownFacility> {
        let mut neighbors = self
            .edges
            .get(origin)
            .cloned()
            .ok_or_else(|| UnknownFacility(origin.clone()))?;
        // stable: ties keep source order
        neighbors.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(neighbors)
    }
}
