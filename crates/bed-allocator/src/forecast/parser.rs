use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::allocation::{
    CapacitySnapshotSet, FacilityCapacitySnapshot, FacilityKey, FacilityRegistry, Period,
};

/// Snapshots aggregated from a forecast export.
#[derive(Debug, Default)]
pub struct ForecastImport {
    pub snapshots: CapacitySnapshotSet,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

const HOSPITAL_COLUMNS: [&str; 2] = ["Hospital", "Hospital (DSCC Region)"];

pub(crate) fn parse_forecast<R: Read>(
    reader: R,
    registry: &mut FacilityRegistry,
) -> Result<ForecastImport, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let name_column = hospital_column(&headers);
    let mut totals: BTreeMap<(FacilityKey, Period), RunningMean> = BTreeMap::new();
    let mut rows_read = 0;
    let mut rows_skipped = 0;

    for (index, record) in csv_reader.records().enumerate() {
        rows_read += 1;
        // header is line 1
        let line = index + 2;

        let record = match record {
            Ok(record) if record.len() == headers.len() => record,
            Ok(record) => {
                warn!(
                    line,
                    fields = record.len(),
                    expected = headers.len(),
                    "skipping forecast row with the wrong number of fields"
                );
                rows_skipped += 1;
                continue;
            }
            Err(err) => {
                warn!(line, error = %err, "skipping unreadable forecast row");
                rows_skipped += 1;
                continue;
            }
        };
        let row: ForecastRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(err) => {
                warn!(line, error = %err, "skipping undecodable forecast row");
                rows_skipped += 1;
                continue;
            }
        };
        let hospital = name_column
            .and_then(|column| record.get(column))
            .unwrap_or_default();

        let Some(parsed) = row.parse() else {
            warn!(line, hospital, "skipping forecast row with missing or invalid values");
            rows_skipped += 1;
            continue;
        };
        let key = match registry.register(hospital) {
            Ok(key) => key,
            Err(err) => {
                warn!(line, error = %err, "skipping forecast row without a facility name");
                rows_skipped += 1;
                continue;
            }
        };

        totals
            .entry((key, parsed.period))
            .or_default()
            .push(&parsed.snapshot);
    }

    let mut snapshots = CapacitySnapshotSet::new();
    for ((facility, period), mean) in totals {
        // keys are unique after grouping
        if let Err(err) = snapshots.insert(facility, period, mean.finish()) {
            warn!(error = %err, "duplicate forecast snapshot ignored");
        }
    }

    Ok(ForecastImport {
        snapshots,
        rows_read,
        rows_skipped,
    })
}

/// First facility-name column present, in order of preference.
fn hospital_column(headers: &csv::StringRecord) -> Option<usize> {
    HOSPITAL_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|header| header == *name))
}

struct ParsedRow {
    period: Period,
    snapshot: FacilityCapacitySnapshot,
}

/// Capacity columns of one forecast row; the facility name is read by position.
#[derive(Debug, Deserialize)]
struct ForecastRow {
    #[serde(rename = "Year", default, deserialize_with = "empty_string_as_none")]
    year: Option<String>,
    #[serde(rename = "Month", default, deserialize_with = "empty_string_as_none")]
    month: Option<String>,
    #[serde(rename = "Beds Total", default, deserialize_with = "empty_string_as_none")]
    beds_total: Option<String>,
    #[serde(rename = "Beds Occupied", default, deserialize_with = "empty_string_as_none")]
    beds_occupied: Option<String>,
    #[serde(rename = "ICU Beds Total", default, deserialize_with = "empty_string_as_none")]
    icu_total: Option<String>,
    #[serde(
        rename = "ICU Beds Occupied",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    icu_occupied: Option<String>,
}

impl ForecastRow {
    fn parse(&self) -> Option<ParsedRow> {
        let year = parse_whole(self.year.as_deref()?)?;
        let month = parse_whole(self.month.as_deref()?)?;
        let period = Period::new(i32::try_from(year).ok()?, u32::try_from(month).ok()?)?;

        Some(ParsedRow {
            period,
            snapshot: FacilityCapacitySnapshot {
                beds_total: parse_count(self.beds_total.as_deref()?)?,
                beds_occupied: parse_count(self.beds_occupied.as_deref()?)?,
                icu_total: parse_count(self.icu_total.as_deref()?)?,
                icu_occupied: parse_count(self.icu_occupied.as_deref()?)?,
            },
        })
    }
}

#[derive(Default)]
struct RunningMean {
    rows: u32,
    beds_total: f64,
    beds_occupied: f64,
    icu_total: f64,
    icu_occupied: f64,
}

impl RunningMean {
    fn push(&mut self, snapshot: &FacilityCapacitySnapshot) {
        self.rows += 1;
        self.beds_total += snapshot.beds_total;
        self.beds_occupied += snapshot.beds_occupied;
        self.icu_total += snapshot.icu_total;
        self.icu_occupied += snapshot.icu_occupied;
    }

    fn finish(self) -> FacilityCapacitySnapshot {
        let rows = f64::from(self.rows.max(1));
        FacilityCapacitySnapshot {
            beds_total: self.beds_total / rows,
            beds_occupied: self.beds_occupied / rows,
            icu_total: self.icu_total / rows,
            icu_occupied: self.icu_occupied / rows,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Non-negative finite number; spreadsheet exports may carry thousands separators.
pub(crate) fn parse_count(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', "");
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite() && *number >= 0.0)
}

/// Whole number written either as `2026` or `2026.0`.
fn parse_whole(value: &str) -> Option<i64> {
    let number = value.trim().parse::<f64>().ok()?;
    (number.is_finite() && number.fract() == 0.0).then_some(number as i64)
}

#[cfg(test)]
pub(crate) fn parse_count_for_tests(value: &str) -> Option<f64> {
    parse_count(value)
}

#[cfg(test)]
pub(crate) fn parse_whole_for_tests(value: &str) -> Option<i64> {
    parse_whole(value)
}
