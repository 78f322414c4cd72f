use crate::config::{self, StudioConfig};
use crate::io::output::{create_writer, OutputFormat, ReportSection};
use crate::metrics::{CollaboratorOptions, DashboardReport, FilterSpec, MetricsCalculator};
use crate::observability;
use crate::plan::ConfiguredPlanResolver;
use crate::repository::{JsonRepository, RecordRepository};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct ReportConfig {
    pub data: PathBuf,
    pub period: Option<u32>,
    pub client: Option<String>,
    pub brand: Option<String>,
    pub collaborator: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub content_type: Option<String>,
    pub section: ReportSection,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub now: Option<DateTime<Utc>>,
    pub no_color: bool,
}

pub fn handle_report(report_config: ReportConfig) -> Result<()> {
    let settings = match &report_config.config {
        Some(path) => config::load_config_from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_config(),
    };
    configure_color(&report_config, &settings);

    let _source = observability::set_data_source(&report_config.data);
    let report = calculate_report(&report_config, &settings)?;

    let format = report_config
        .format
        .or(settings.output.default_format)
        .unwrap_or(OutputFormat::Terminal);
    write_report(&report, format, report_config.section, report_config.output.as_ref())
}

/// Load records and run the metrics pipeline.
pub fn calculate_report(
    report_config: &ReportConfig,
    settings: &StudioConfig,
) -> Result<DashboardReport> {
    let repository = JsonRepository::open(&report_config.data)
        .with_context(|| format!("Failed to open {}", report_config.data.display()))?;
    let snapshot = repository.snapshot()?;
    tracing::info!(
        tasks = snapshot.tasks.len(),
        brands = snapshot.brands.len(),
        clients = snapshot.clients.len(),
        collaborators = snapshot.collaborators.len(),
        "Loaded records from {}",
        repository.path().display()
    );

    let filters = build_filters(report_config, settings);
    let plans = ConfiguredPlanResolver::from_config(&settings.plans);
    let calculator = MetricsCalculator::new(
        &plans,
        CollaboratorOptions::from(&settings.collaborators),
    );
    let calculator = match report_config.now {
        Some(now) => calculator.at(now),
        None => calculator,
    };

    Ok(calculator.calculate(&snapshot, &filters))
}

pub fn build_filters(report_config: &ReportConfig, settings: &StudioConfig) -> FilterSpec {
    let period = report_config
        .period
        .unwrap_or(settings.filters.default_period_days);
    let mut filters = FilterSpec::new(period);

    if let Some(client) = &report_config.client {
        filters = filters.with_client(client.as_str());
    }
    if let Some(brand) = &report_config.brand {
        filters = filters.with_brand(brand.as_str());
    }
    if let Some(name) = &report_config.collaborator {
        filters = filters.with_collaborator(name.as_str());
    }
    if let Some(status) = &report_config.status {
        filters = filters.with_status(status);
    }
    if let Some(priority) = &report_config.priority {
        filters = filters.with_priority(priority);
    }
    if let Some(content_type) = &report_config.content_type {
        filters = filters.with_content_type(content_type.as_str());
    }
    filters
}

fn configure_color(report_config: &ReportConfig, settings: &StudioConfig) {
    let disabled = report_config.no_color
        || report_config.output.is_some()
        || settings.output.use_color == Some(false);
    if disabled {
        colored::control::set_override(false);
    } else if settings.output.use_color == Some(true) {
        colored::control::set_override(true);
    }
}

fn write_report(
    report: &DashboardReport,
    format: OutputFormat,
    section: ReportSection,
    output: Option<&PathBuf>,
) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                crate::io::ensure_dir(parent)?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            create_writer(format, &mut writer).write_report(report, section)?;
            writer.flush()?;
            tracing::info!("Wrote report to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            create_writer(format, &mut handle).write_report(report, section)?;
            handle.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TaskPriority, TaskStatus};
    use chrono::TimeZone;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn report_config(data: PathBuf) -> ReportConfig {
        ReportConfig {
            data,
            period: None,
            client: None,
            brand: None,
            collaborator: None,
            status: None,
            priority: None,
            content_type: None,
            section: ReportSection::All,
            format: None,
            output: None,
            config: None,
            now: Some(Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()),
            no_color: true,
        }
    }

    #[test]
    fn test_build_filters_prefers_cli_period() {
        let mut settings = StudioConfig::default();
        settings.filters.default_period_days = 14;

        let mut cfg = report_config(PathBuf::from("unused.json"));
        assert_eq!(build_filters(&cfg, &settings).period_days, 14);

        cfg.period = Some(7);
        cfg.status = Some("en_revision".into());
        cfg.priority = Some("urgente".into());
        cfg.client = Some("  ".into());
        let filters = build_filters(&cfg, &settings);
        assert_eq!(filters.period_days, 7);
        assert_eq!(filters.status, Some(TaskStatus::InReview));
        assert_eq!(filters.priority, Some(TaskPriority::Urgent));
        assert_eq!(filters.client_id, None);
    }

    #[test]
    fn test_calculate_report_uses_configured_tier() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("export.json");
        fs::write(
            &data,
            indoc! {r#"
                {
                  "tasks": [
                    {"id": 1, "title": "A", "brand_id": "b1", "status": "pendiente", "created_at": "2024-06-29"},
                    {"id": 2, "title": "B", "brand_id": "b1", "status": "pendiente", "created_at": "2024-06-29"},
                    {"id": 3, "title": "C", "brand_id": "b1", "status": "pendiente", "created_at": "2024-06-29"},
                    {"id": 4, "title": "D", "brand_id": "b1", "status": "pendiente", "created_at": "2024-06-29"}
                  ],
                  "brands": [{"id": "b1", "name": "Acme"}]
                }
            "#},
        )
        .unwrap();

        let settings = config::parse_and_validate_config(indoc! {r#"
            [plans.tiers.pro]
            max_active_tasks = 5

            [plans.brands]
            b1 = "pro"
        "#})
        .unwrap();

        let report = calculate_report(&report_config(data), &settings).unwrap();
        assert_eq!(report.brand_limits[0].limit, 5);
        assert!(!report.brand_limits[0].over_limit);
        assert_eq!(report.control.over_limit.count, 0);
    }

    #[test]
    fn test_handle_report_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("export.json");
        fs::write(&data, r#"{"tasks": []}"#).unwrap();
        let out = dir.path().join("out/report.json");

        let mut cfg = report_config(data);
        cfg.format = Some(OutputFormat::Json);
        cfg.section = ReportSection::Summary;
        cfg.output = Some(out.clone());
        handle_report(cfg).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(written["total"], 0);
        assert_eq!(written["completion_rate"], 0);
    }

    #[test]
    fn test_missing_data_is_error() {
        let dir = TempDir::new().unwrap();
        let cfg = report_config(dir.path().join("nope.json"));
        let err = calculate_report(&cfg, &StudioConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }
}
