use bed_allocator::allocation::{
    canonicalize, CapacitySnapshotProvider, DatasetLoader, DistanceGraphProvider,
    FacilityRegistry, Period,
};
use bed_allocator::forecast::{
    dataset_from_readers, CsvDatasetLoader, DistanceMatrixImporter, ForecastImporter,
};

#[test]
fn sample_forecast_parses_spreadsheet_formatted_counts() {
    let data = include_bytes!("../../../data/forecast.csv");
    let mut registry = FacilityRegistry::new();
    let import = ForecastImporter::from_reader(&data[..], &mut registry).expect("forecast imports");

    assert_eq!(import.rows_read, 24);
    assert_eq!(import.rows_skipped, 0);

    let dmch = canonicalize("Dhaka Medical College Hospital").expect("name");
    let snapshot = import
        .snapshots
        .lookup(&dmch, Period::new(2026, 6).expect("valid"))
        .expect("june snapshot");
    assert_eq!(snapshot.beds_total, 2600.0);
    assert_eq!(snapshot.beds_occupied, 2410.0);
}

#[test]
fn sample_matrix_reads_origins_from_columns() {
    let data = include_bytes!("../../../data/distance_matrix.csv");
    let mut registry = FacilityRegistry::new();
    let graph =
        DistanceMatrixImporter::from_reader(&data[..], &mut registry).expect("matrix imports");

    let mugda = canonicalize("Mugda General Hospital").expect("name");
    let shishu = canonicalize("Bangladesh Shishu Hospital & Institute").expect("name");
    assert!(!graph.contains_origin(&shishu));

    let nearest = graph
        .neighbors_sorted_by_distance(&mugda)
        .expect("mugda is an origin");
    assert_eq!(nearest.len(), 6);
    assert_eq!(nearest[0].facility, mugda);
    assert_eq!(nearest[1].distance_km, 4.87);
}

#[test]
fn ragged_forecast_rows_do_not_fail_the_dataset() {
    let forecast = "Year,Month,Hospital,Beds Total,Beds Occupied,ICU Beds Total,ICU Beds Occupied\n\
2026,7,Mugda General Hospital,500,480\n\
2026,7,Kurmitola General Hospital,500,300,20,12\n";
    let matrix = "Hospital,Mugda General Hospital\nMugda General Hospital,0\n";
    let dataset = dataset_from_readers(forecast.as_bytes(), matrix.as_bytes())
        .expect("ragged row skipped");
    assert_eq!(dataset.capacity.len(), 1);
}

#[test]
fn forecast_without_capacity_columns_yields_no_snapshots() {
    let forecast = "Hospital,Year,Month\nMugda General Hospital,2026,7\n";
    let matrix = "Hospital,Mugda General Hospital\nMugda General Hospital,0\n";
    let dataset = dataset_from_readers(forecast.as_bytes(), matrix.as_bytes())
        .expect("headers are not mandatory");
    assert!(dataset.capacity.is_empty());
    assert_eq!(dataset.registry.len(), 1);
}

#[test]
fn loader_reports_the_missing_path() {
    let loader = CsvDatasetLoader::new(
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/forecast.csv"),
        "/nonexistent/distance_matrix.csv",
    );
    let error = loader.load().expect_err("missing matrix");
    assert!(error.to_string().contains("/nonexistent/distance_matrix.csv"));
}
