use std::io::Read;

use tracing::warn;

use super::parser::parse_count;
use super::ForecastImportError;
use crate::allocation::{DistanceGraph, FacilityKey, FacilityRegistry};

/// Parse a square-ish distance matrix.
///
/// Header cells after the first name the origins; each row names a candidate followed by
/// one distance per origin column. Blank or non-numeric cells are missing edges.
pub(crate) fn parse_matrix<R: Read>(
    reader: R,
    registry: &mut FacilityRegistry,
) -> Result<DistanceGraph, ForecastImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let origins: Vec<Option<FacilityKey>> = headers
        .iter()
        .skip(1)
        .map(|name| registry.register(name).ok())
        .collect();
    if origins.iter().all(Option::is_none) {
        return Err(ForecastImportError::EmptyMatrix);
    }

    let mut graph = DistanceGraph::new();
    for origin in origins.iter().flatten() {
        graph.add_origin(origin.clone());
    }

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        let Some(candidate) = record.get(0).and_then(|name| registry.register(name).ok()) else {
            warn!(line, "skipping distance row without a facility name");
            continue;
        };

        for (column, origin) in origins.iter().enumerate() {
            let Some(origin) = origin else {
                continue;
            };
            let Some(distance) = record.get(column + 1).and_then(parse_count) else {
                continue;
            };
            if !graph.insert(origin.clone(), candidate.clone(), distance) {
                warn!(line, %origin, %candidate, "duplicate distance entry ignored");
            }
        }
    }

    Ok(graph)
}
