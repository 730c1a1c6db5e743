//! CLI command for analytics export

use crate::config::Settings;
use crate::error::{FiscallyError, FiscallyResult};
use crate::export::{export_json, export_yaml, AnalyticsExport};
use crate::services::GoalService;
use crate::storage::{JsonSnapshotStore, ProfileSource};
use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::report::{build_dashboard, parse_month};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Handle the export command
///
/// Writes to `output` when given, otherwise to stdout.
pub fn handle_export(
    store: &JsonSnapshotStore,
    settings: &Settings,
    format: ExportFormat,
    month: Option<String>,
    output: Option<PathBuf>,
) -> FiscallyResult<()> {
    let now = chrono::Utc::now();
    let today = chrono::Local::now().date_naive();
    let month = parse_month(month.as_deref(), today)?;

    let dashboard = build_dashboard(store, settings, month, today)?;
    let profile = store.load_profile()?;
    let plan = GoalService::new(store, &settings.engine).plan(
        &profile,
        dashboard.aggregate.total_spent,
        today,
    );

    let export = AnalyticsExport::new(dashboard, plan, now);

    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                FiscallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(&export, format, &mut writer)?;
            writer.flush()?;
            println!("Analytics for {} exported to: {}", month, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(&export, format, &mut writer)?;
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    export: &AnalyticsExport,
    format: ExportFormat,
    writer: &mut W,
) -> FiscallyResult<()> {
    match format {
        ExportFormat::Json => export_json(export, writer),
        ExportFormat::Yaml => export_yaml(export, writer),
    }
}
