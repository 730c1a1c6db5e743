//! JSON Export functionality
//!
//! Serializes the computed view-models (dashboard and the goal plan) with a
//! schema version so downstream consumers can check
//! compatibility.

use crate::analytics::{AllocationMatrix, BudgetAnalysis, GoalProgressReport};
use crate::error::FiscallyResult;
use crate::services::{Dashboard, GoalPlan};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.1.0";

/// Everything the engine computed for one month
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub dashboard: Dashboard,

    pub allocation: AllocationMatrix,

    pub goal_progress: GoalProgressReport,

    pub budget_analysis: BudgetAnalysis,
}

impl AnalyticsExport {
    pub fn new(dashboard: Dashboard, plan: GoalPlan, exported_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            dashboard,
            allocation: plan.allocation,
            goal_progress: plan.progress,
            budget_analysis: plan.analysis,
        }
    }
}

/// Write the export as pretty-printed JSON
pub fn export_json<W: Write>(export: &AnalyticsExport, writer: &mut W) -> FiscallyResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)?;
    writeln!(writer)?;
    Ok(())
}
