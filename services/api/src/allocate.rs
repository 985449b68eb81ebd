use crate::cli::DatasetArgs;
use crate::infra::load_service;
use bed_allocator::allocation::{AllocationResult, AllocationSubmission, ClinicalFlag};
use bed_allocator::config::AppConfig;
use bed_allocator::error::AppError;
use clap::Args;

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Facility the patient presented at
    #[arg(long)]
    pub(crate) facility: String,
    /// Admission date (YYYY-MM-DD); its month selects the forecast period
    #[arg(long)]
    pub(crate) date: String,
    /// Age in whole years
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) age: i64,
    /// Weight in kilograms
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) weight: f64,
    /// Platelet count per microlitre
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) platelet_count: i64,
    /// IgG result: Positive/Negative, 1/0 or true/false
    #[arg(long)]
    pub(crate) igg: String,
    /// IgM result: Positive/Negative, 1/0 or true/false
    #[arg(long)]
    pub(crate) igm: String,
    /// NS1 result: Positive/Negative, 1/0 or true/false
    #[arg(long)]
    pub(crate) ns1: String,
    /// Treat the facility as full so the nearest alternative is reported
    #[arg(long)]
    pub(crate) simulate_home_full: bool,
    /// Print the decision as JSON
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) dataset: DatasetArgs,
}

impl AllocateArgs {
    fn submission(&self) -> AllocationSubmission {
        AllocationSubmission {
            facility: self.facility.clone(),
            date: self.date.clone(),
            age: self.age,
            weight: self.weight,
            platelet_count: self.platelet_count,
            igg: ClinicalFlag::Label(self.igg.clone()),
            igm: ClinicalFlag::Label(self.igm.clone()),
            ns1: ClinicalFlag::Label(self.ns1.clone()),
            simulate_home_full: self.simulate_home_full,
        }
    }
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    let submission = args.submission();
    let json = args.json;
    args.dataset.apply(&mut config);

    let service = load_service(&config.allocation)?;
    let result = service.allocate(&submission)?;

    if json {
        let rendered = serde_json::to_string_pretty(&result)
            .map_err(|err| AppError::Io(err.into()))?;
        println!("{rendered}");
    } else {
        for line in render_lines(&result) {
            println!("{line}");
        }
    }

    Ok(())
}

pub(crate) fn render_lines(result: &AllocationResult) -> Vec<String> {
    let mut lines = vec![
        format!("Date: {}", result.date),
        format!("Verdict: {}", result.verdict),
        format!("Resource Needed: {}", result.resource),
        format!("Hospital Tried: {}", result.tried_facility),
        format!(
            "Available at Current Hospital: {:?}",
            result.available_at_current
        ),
        format!(
            "Assigned Hospital: {}",
            result.assigned_facility.as_deref().unwrap_or("-")
        ),
    ];
    if let Some(km) = result.distance_km {
        lines.push(format!("Distance (KM): {km:.2}"));
    }
    lines.push(format!("Note: {}", result.note));
    lines
}
