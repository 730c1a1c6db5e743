//! Export module for Fiscally
//!
//! Machine-readable exports of the computed view-models:
//! - JSON: schema-versioned, for other tools
//! - YAML: the same payload, for people
//!
//! CSV renderings live with the reports.

pub mod json;
pub mod yaml;

pub use json::{export_json, AnalyticsExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::CategoryTaxonomy;
    use crate::config::{EngineSettings, FiscallyPaths};
    use crate::models::{Goal, Money, Month, Profile};
    use crate::services::{DashboardService, GoalService, RecomputeTrigger};
    use crate::storage::{GoalStore, JsonSnapshotStore, TransactionSource};
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_export() -> AnalyticsExport {
        let temp_dir = TempDir::new().unwrap();
        let store =
            JsonSnapshotStore::open(FiscallyPaths::with_base_dir(temp_dir.path().to_path_buf()))
                .unwrap();
        let taxonomy = CategoryTaxonomy::default();
        let settings = EngineSettings::default();
        let profile = Profile::new(Money::from_minor(80_000), Money::from_minor(50_000));
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let source: &dyn TransactionSource = &store;

        let dashboard = DashboardService::new(source, &taxonomy, &settings).recompute(
            RecomputeTrigger::InitialLoad,
            &profile,
            Month::new(2025, 1).unwrap(),
            today,
        );
        store
            .sync_goals(vec![Goal::new("fund", "Emergency Fund", 1, Money::from_minor(120_000))])
            .unwrap();
        let plan = GoalService::new(&store, &settings).plan(
            &profile,
            dashboard.aggregate.total_spent,
            today,
        );

        AnalyticsExport::new(
            dashboard,
            plan,
            Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_json_export() {
        let mut buffer = Vec::new();
        export_json(&sample_export(), &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["dashboard"]["month"], "2025-01");
        assert_eq!(value["dashboard"]["insights"]["headline"]["rule"], "start-tracking");
        assert_eq!(value["allocation"]["allocations"][0]["goal_id"], "fund");
        assert_eq!(value["goal_progress"]["expected_savings"], 30_000);
        assert_eq!(
            value["budget_analysis"]["tip"],
            "To reach your goals, aim to save 100.00 per month."
        );
    }

    #[test]
    fn test_yaml_export() {
        let mut buffer = Vec::new();
        export_yaml(&sample_export(), &mut buffer).unwrap();

        let yaml = String::from_utf8(buffer).unwrap();
        assert!(yaml.starts_with("# Fiscally Analytics Export"));
        assert!(yaml.contains("schema_version:"));
        assert!(yaml.contains("goal_id: fund"));
    }
}
