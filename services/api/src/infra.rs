use bed_allocator::allocation::{AllocationService, DatasetLoader, DatasetStore};
use bed_allocator::config::AllocationConfig;
use bed_allocator::error::AppError;
use bed_allocator::forecast::CsvDatasetLoader;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Allocation service reading the configured CSV exports; no dataset is loaded yet.
pub(crate) fn build_service(config: &AllocationConfig) -> Arc<AllocationService<CsvDatasetLoader>> {
    let loader = CsvDatasetLoader::new(&config.forecast_csv, &config.distance_csv);
    Arc::new(AllocationService::new(
        Arc::new(loader),
        config.severity_policy,
    ))
}

/// Allocation service with the configured CSV exports already loaded.
///
/// Import failures surface as [`AppError::Forecast`] so one-shot commands can report them.
pub(crate) fn load_service(
    config: &AllocationConfig,
) -> Result<Arc<AllocationService<CsvDatasetLoader>>, AppError> {
    let loader = CsvDatasetLoader::new(&config.forecast_csv, &config.distance_csv);
    let dataset = loader.load()?;
    Ok(Arc::new(AllocationService::with_store(
        Arc::new(loader),
        Arc::new(DatasetStore::new(dataset)),
        config.severity_policy,
    )))
}

#[cfg(test)]
pub(crate) fn test_config() -> bed_allocator::config::AppConfig {
    use bed_allocator::allocation::SeverityPolicy;
    use bed_allocator::config::{AppConfig, AppEnvironment, ServerConfig, TelemetryConfig};

    AppConfig {
        environment: AppEnvironment::Test,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        telemetry: TelemetryConfig {
            log_level: "info".to_string(),
        },
        allocation: AllocationConfig {
            forecast_csv: "data/forecast.csv".into(),
            distance_csv: "data/distance_matrix.csv".into(),
            severity_policy: SeverityPolicy::Weighted,
        },
    }
}

#[cfg(test)]
pub(crate) fn sample_config() -> AllocationConfig {
    let data = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
    AllocationConfig {
        forecast_csv: data.join("forecast.csv"),
        distance_csv: data.join("distance_matrix.csv"),
        severity_policy: bed_allocator::allocation::SeverityPolicy::Weighted,
    }
}
