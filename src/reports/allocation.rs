//! Goal Allocation Report
//!
//! Renders an allocation matrix, optionally with the progress read-model,
//! as a priority-ordered table, and the per-goal savings recommendations.

use std::io::Write;

use crate::analytics::{AllocationMatrix, BudgetAnalysis, GoalProgressReport};
use crate::error::FiscallyResult;

/// Goal allocation report
#[derive(Debug, Clone)]
pub struct AllocationReport<'a> {
    matrix: &'a AllocationMatrix,
    progress: Option<&'a GoalProgressReport>,
}

fn flag(set: bool) -> &'static str {
    if set {
        "yes"
    } else {
        "no"
    }
}

impl<'a> AllocationReport<'a> {
    pub fn new(matrix: &'a AllocationMatrix) -> Self {
        Self {
            matrix,
            progress: None,
        }
    }

    /// Include projected completion dates and the progress tip
    pub fn with_progress(mut self, progress: &'a GoalProgressReport) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let m = self.matrix;
        let mut output = String::new();

        output.push_str("Goal Allocation\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!("Savings Pool:   {}\n", m.savings_pool));
        output.push_str(&format!("Total Needed:   {}\n", m.total_needed));
        output.push_str(&format!("Shortfall:      {}\n", m.shortfall));
        output.push_str(&format!("Unallocated:    {}\n", m.unallocated));
        if m.budget_exceeded {
            output.push_str("Planned budget exceeds income; nothing can be allocated.\n");
        }
        output.push('\n');

        if m.allocations.is_empty() {
            output.push_str("No goals yet.\n");
        } else {
            output.push_str(&format!(
                "{:>4}  {:<24} {:>12} {:>12} {:>12}  {}\n",
                "Prio", "Goal", "Needed", "Ideal/mo", "Alloc/mo", "Flags"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for a in &m.allocations {
                let mut flags = Vec::new();
                if a.is_underfunded {
                    flags.push("underfunded");
                }
                if a.deadline_at_risk {
                    flags.push("deadline at risk");
                }

                output.push_str(&format!(
                    "{:>4}  {:<24} {:>12} {:>12} {:>12}  {}\n",
                    a.priority,
                    a.label,
                    a.amount_needed,
                    a.ideal_monthly,
                    a.allocated_monthly,
                    flags.join(", ")
                ));

                let projected = self
                    .progress
                    .and_then(|p| p.goals.iter().find(|g| g.goal_id == a.goal_id));
                if let Some(goal) = projected {
                    let eta = goal
                        .projected_completion
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".into());
                    output.push_str(&format!(
                        "      {:.1}% saved, done by {}{}\n",
                        goal.progress_percent,
                        eta,
                        if goal.on_track { "" } else { " (behind)" }
                    ));
                }
            }
        }

        if let Some(progress) = self.progress {
            let savings = &progress.savings;
            output.push('\n');
            output.push_str(&format!(
                "Spent this month: {} ({:.1}% of budget)\n",
                savings.monthly_expenses, savings.budget_used_percent
            ));
            output.push_str(&format!(
                "Saved this month: {} (planned {}, {} vs plan)\n",
                savings.actual_savings, savings.expected_savings, savings.savings_vs_expected
            ));
            output.push('\n');
            output.push_str(&progress.tip);
            output.push('\n');
        }

        output
    }

    /// Export the allocation to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FiscallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record([
            "Priority",
            "Goal ID",
            "Goal",
            "Target Date",
            "Amount Needed",
            "Months Remaining",
            "Ideal Monthly",
            "Allocated Monthly",
            "Underfunded",
            "Deadline At Risk",
        ])?;

        for a in &self.matrix.allocations {
            csv.write_record(&[
                a.priority.to_string(),
                a.goal_id.to_string(),
                a.label.clone(),
                a.target_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                a.amount_needed.to_string(),
                a.months_remaining.to_string(),
                a.ideal_monthly.to_string(),
                a.allocated_monthly.to_string(),
                flag(a.is_underfunded).to_string(),
                flag(a.deadline_at_risk).to_string(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

/// Monthly savings recommendations per goal
#[derive(Debug, Clone)]
pub struct BudgetAnalysisReport<'a> {
    analysis: &'a BudgetAnalysis,
}

impl<'a> BudgetAnalysisReport<'a> {
    pub fn new(analysis: &'a BudgetAnalysis) -> Self {
        Self { analysis }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Budget Analysis\n");
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.analysis.has_goals {
            output.push_str(&format!(
                "{:<24} {:>12} {:>12} {:>8}  {}\n",
                "Goal", "Target Date", "Monthly", "Months", "Status"
            ));
            output.push_str(&"-".repeat(80));
            output.push('\n');

            for goal in &self.analysis.goals {
                let deadline = goal
                    .target_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".into());
                output.push_str(&format!(
                    "{:<24} {:>12} {:>12} {:>8}  {}\n",
                    goal.label,
                    deadline,
                    goal.monthly_needed.to_string(),
                    goal.months_remaining,
                    goal.status.label()
                ));
            }
            output.push('\n');
        }

        output.push_str(&self.analysis.tip);
        output.push('\n');
        output
    }
}
