use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::Period;
use super::facility::FacilityKey;
use super::resource::{CapacityField, ResourceRequirement};

/// Forecast bed and ICU counts for one facility in one month.
///
/// Occupied counts may equal or exceed totals; that reads as full, not as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacilityCapacitySnapshot {
    pub beds_total: f64,
    pub beds_occupied: f64,
    pub icu_total: f64,
    pub icu_occupied: f64,
}

impl FacilityCapacitySnapshot {
    pub fn read(&self, field: CapacityField) -> f64 {
        match field {
            CapacityField::BedsTotal => self.beds_total,
            CapacityField::BedsOccupied => self.beds_occupied,
            CapacityField::IcuTotal => self.icu_total,
            CapacityField::IcuOccupied => self.icu_occupied,
        }
    }

    /// Strictly more capacity than occupancy for the resource.
    pub fn has_room(&self, requirement: ResourceRequirement) -> bool {
        let fields = requirement.capacity_fields();
        self.read(fields.total) > self.read(fields.occupied)
    }

    /// Copy with the resource's occupancy raised to its total.
    pub fn saturated(mut self, requirement: ResourceRequirement) -> Self {
        match requirement {
            ResourceRequirement::GeneralBed => self.beds_occupied = self.beds_total,
            ResourceRequirement::IcuBed => self.icu_occupied = self.icu_total,
        }
        self
    }
}

/// Read access to forecast capacity keyed by facility and month.
pub trait CapacitySnapshotProvider: Send + Sync {
    fn lookup(&self, facility: &FacilityKey, period: Period) -> Option<FacilityCapacitySnapshot>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapacityError {
    #[error("snapshot for {facility} in {period} already recorded")]
    Duplicate { facility: FacilityKey, period: Period },
}

/// Immutable set of snapshots, at most one per (facility, month).
#[derive(Debug, Clone, Default)]
pub struct CapacitySnapshotSet {
    snapshots: BTreeMap<(FacilityKey, Period), FacilityCapacitySnapshot>,
}

impl CapacitySnapshotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        facility: FacilityKey,
        period: Period,
        snapshot: FacilityCapacitySnapshot,
    ) -> Result<(), CapacityError> {
        let key = (facility, period);
        if self.snapshots.contains_key(&key) {
            let (facility, period) = key;
            return Err(CapacityError::Duplicate { facility, period });
        }
        self.snapshots.insert(key, snapshot);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Distinct forecast months covered, ascending.
    pub fn periods(&self) -> Vec<Period> {
        let mut periods: Vec<Period> = self.snapshots.keys().map(|(_, period)| *period).collect();
        periods.sort();
        periods.dedup();
        periods
    }
}

impl CapacitySnapshotProvider for CapacitySnapshotSet {
    fn lookup(&self, facility: &FacilityKey, period: Period) -> Option<FacilityCapacitySnapshot> {
        self.snapshots.get(&(facility.clone(), period)).copied()
    }
}
