//! CLI commands for spending reports
//!
//! `spending` prints the category table for a month (or writes it as CSV);
//! `insights` prints only the headline and tip.

use crate::config::Settings;
use crate::error::{FiscallyError, FiscallyResult};
use crate::models::Month;
use crate::reports::SpendingReport;
use crate::services::{Dashboard, DashboardService, RecomputeTrigger};
use crate::storage::{JsonSnapshotStore, ProfileSource, TransactionSource};
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Parse a `YYYY-MM` argument, defaulting to the month containing `today`
pub fn parse_month(month: Option<&str>, today: NaiveDate) -> FiscallyResult<Month> {
    match month {
        Some(s) => Month::parse(s).map_err(|e| {
            FiscallyError::Validation(format!(
                "Invalid month format: {}. Use YYYY-MM (e.g., 2025-01)",
                e
            ))
        }),
        None => Ok(Month::containing(today)),
    }
}

/// Recompute the dashboard for a month from the local snapshot
pub fn build_dashboard(
    store: &JsonSnapshotStore,
    settings: &Settings,
    month: Month,
    today: NaiveDate,
) -> FiscallyResult<Dashboard> {
    let taxonomy = store.load_taxonomy()?;
    let profile = store.load_profile()?;
    let source: &dyn TransactionSource = store;

    Ok(DashboardService::new(source, &taxonomy, &settings.engine).recompute(
        RecomputeTrigger::Refresh,
        &profile,
        month,
        today,
    ))
}

/// Handle the spending report
pub fn handle_spending_report(
    store: &JsonSnapshotStore,
    settings: &Settings,
    month: Option<String>,
    top: Option<usize>,
    output: Option<PathBuf>,
) -> FiscallyResult<()> {
    let today = chrono::Local::now().date_naive();
    let month = parse_month(month.as_deref(), today)?;
    let dashboard = build_dashboard(store, settings, month, today)?;
    let mut report = SpendingReport::generate(&dashboard);

    if let Some(limit) = top {
        report.categories.truncate(limit);
    }

    if let Some(path) = output {
        let file = File::create(&path).map_err(|e| {
            FiscallyError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        report.export_csv(BufWriter::new(file))?;
        println!("Spending report exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

/// Handle the insights command
pub fn handle_insights(
    store: &JsonSnapshotStore,
    settings: &Settings,
    month: Option<String>,
) -> FiscallyResult<()> {
    let today = chrono::Local::now().date_naive();
    let month = parse_month(month.as_deref(), today)?;
    let dashboard = build_dashboard(store, settings, month, today)?;

    let headline = &dashboard.insights.headline;
    let tip = &dashboard.insights.tip;

    println!("Insights for {}", month);
    println!();
    println!("{} {}", headline.glyph, headline.message);
    println!("{} {}", tip.glyph, tip.message);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(
            parse_month(None, today).unwrap(),
            Month::new(2025, 3).unwrap()
        );
        assert_eq!(
            parse_month(Some("2024-11"), today).unwrap(),
            Month::new(2024, 11).unwrap()
        );
        assert!(parse_month(Some("2024-13"), today).unwrap_err().is_validation());
        assert!(parse_month(Some("march"), today).unwrap_err().is_validation());
    }
}
