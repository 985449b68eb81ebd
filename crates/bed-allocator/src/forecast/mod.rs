//! Ingestion of forecast exports and distance matrices into allocation datasets.

mod matrix;
mod parser;

pub use parser::ForecastImport;

use crate::allocation::{AllocationDataset, DatasetLoader, DistanceGraph, FacilityRegistry};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
pub enum ForecastImportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
    EmptyMatrix,
}

impl std::fmt::Display for ForecastImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastImportError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ForecastImportError::Csv(err) => write!(f, "invalid forecast CSV data: {}", err),
            ForecastImportError::EmptyMatrix => {
                write!(f, "distance matrix header names no facilities")
            }
        }
    }
}

impl std::error::Error for ForecastImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForecastImportError::Io { source, .. } => Some(source),
            ForecastImportError::Csv(err) => Some(err),
            ForecastImportError::EmptyMatrix => None,
        }
    }
}

impl From<csv::Error> for ForecastImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

fn open(path: &Path) -> Result<std::fs::File, ForecastImportError> {
    std::fs::File::open(path).map_err(|source| ForecastImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads monthly per-facility capacity forecasts.
pub struct ForecastImporter;

impl ForecastImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        registry: &mut FacilityRegistry,
    ) -> Result<ForecastImport, ForecastImportError> {
        let file = open(path.as_ref())?;
        Self::from_reader(file, registry)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        registry: &mut FacilityRegistry,
    ) -> Result<ForecastImport, ForecastImportError> {
        Ok(parser::parse_forecast(reader, registry)?)
    }
}

/// Reads facility-to-facility distance matrices.
pub struct DistanceMatrixImporter;

impl DistanceMatrixImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        registry: &mut FacilityRegistry,
    ) -> Result<DistanceGraph, ForecastImportError> {
        let file = open(path.as_ref())?;
        Self::from_reader(file, registry)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        registry: &mut FacilityRegistry,
    ) -> Result<DistanceGraph, ForecastImportError> {
        matrix::parse_matrix(reader, registry)
    }
}

/// Build a dataset from in-memory forecast and distance exports.
///
/// The forecast is read first so its spellings become the display names.
pub fn dataset_from_readers<F: Read, D: Read>(
    forecast: F,
    distances: D,
) -> Result<AllocationDataset, ForecastImportError> {
    let mut registry = FacilityRegistry::new();
    let import = ForecastImporter::from_reader(forecast, &mut registry)?;
    let graph = DistanceMatrixImporter::from_reader(distances, &mut registry)?;
    Ok(AllocationDataset::new(registry, import.snapshots, graph))
}

/// Dataset loader backed by the forecast and distance CSV exports on disk.
#[derive(Debug, Clone)]
pub struct CsvDatasetLoader {
    forecast_csv: PathBuf,
    distance_csv: PathBuf,
}

impl CsvDatasetLoader {
    pub fn new(forecast_csv: impl Into<PathBuf>, distance_csv: impl Into<PathBuf>) -> Self {
        Self {
            forecast_csv: forecast_csv.into(),
            distance_csv: distance_csv.into(),
        }
    }
}

impl DatasetLoader for CsvDatasetLoader {
    type Error = ForecastImportError;

    fn load(&self) -> Result<AllocationDataset, Self::Error> {
        let mut registry = FacilityRegistry::new();
        let import = ForecastImporter::from_path(&self.forecast_csv, &mut registry)?;
        info!(
            path = %self.forecast_csv.display(),
            rows = import.rows_read,
            skipped = import.rows_skipped,
            snapshots = import.snapshots.len(),
            "forecast export read"
        );
        let graph = DistanceMatrixImporter::from_path(&self.distance_csv, &mut registry)?;
        info!(
            path = %self.distance_csv.display(),
            origins = graph.origin_count(),
            edges = graph.edge_count(),
            "distance matrix read"
        );
        Ok(AllocationDataset::new(registry, import.snapshots, graph))
    }
}
