//! Goal progress read-models
//!
//! Projects each allocation forward: how far the goal is, when it completes
//! at the allocated rate, and whether that lands before its deadline. Also
//! compares this month's actual savings with the planned figure, and turns
//! the allocation into per-goal savings recommendations.

use chrono::NaiveDate;
use serde::Serialize;

use super::allocation::{AllocationMatrix, GoalAllocation};
use crate::models::period::add_months;
use crate::models::{Goal, GoalId, Money};

/// Goals named in the "behind" tip
const MAX_BEHIND_IN_TIP: usize = 2;

/// Goals this close to their deadline are flagged urgent
pub const URGENT_MONTHS: u32 = 3;

/// Income, planned budget and this month's actual spend
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsSummary {
    pub monthly_income: Money,
    pub monthly_budget: Money,
    /// Spend recorded so far this month
    pub monthly_expenses: Money,
    /// `income - expenses`, floored at zero
    pub actual_savings: Money,
    /// Expenses over budget, one decimal (0 without a budget)
    pub budget_used_percent: f64,
    /// `income - budget`, floored at zero (0 without a budget)
    pub expected_savings: Money,
    pub savings_vs_expected: Money,
}

impl SavingsSummary {
    pub fn new(income: Money, budget: Money, expenses: Money) -> Self {
        let actual_savings = (income - expenses).non_negative();

        let (budget_used_percent, expected_savings) = if budget.is_positive() {
            let used = expenses.as_f64() * 100.0 / budget.as_f64();
            ((used * 10.0).round() / 10.0, (income - budget).non_negative())
        } else {
            (0.0, Money::zero())
        };

        Self {
            monthly_income: income,
            monthly_budget: budget,
            monthly_expenses: expenses,
            actual_savings,
            budget_used_percent,
            expected_savings,
            savings_vs_expected: actual_savings - expected_savings,
        }
    }
}

/// Progress of one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub label: String,
    pub priority: u32,
    pub target_amount: Money,
    pub saved_amount: Money,
    pub amount_needed: Money,
    pub allocated_monthly: Money,
    /// Saved over target, capped at 100, one decimal
    pub progress_percent: f64,
    pub months_to_complete: Option<u32>,
    pub projected_completion: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub on_track: bool,
}

/// Progress of every goal plus pool totals and a tip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgressReport {
    #[serde(flatten)]
    pub savings: SavingsSummary,
    pub savings_pool: Money,
    pub unallocated: Money,
    pub total_target: Money,
    pub total_saved: Money,
    pub goals: Vec<GoalProgress>,
    pub tip: String,
}

impl GoalProgressReport {
    pub fn behind(&self) -> impl Iterator<Item = &GoalProgress> {
        self.goals.iter().filter(|g| !g.on_track)
    }
}

/// Saved share of the target, capped at 100 and rounded to one decimal
pub fn progress_percent(saved: Money, target: Money) -> f64 {
    if !target.is_positive() {
        return 0.0;
    }
    let raw = (saved.as_f64() * 100.0 / target.as_f64()).clamp(0.0, 100.0);
    (raw * 10.0).round() / 10.0
}

fn months_to_complete(needed: Money, allocated: Money) -> Option<u32> {
    if !needed.is_positive() || !allocated.is_positive() {
        return None;
    }
    let months = (needed.minor() + allocated.minor() - 1) / allocated.minor();
    u32::try_from(months).ok()
}

fn project(goal: &Goal, allocation: &GoalAllocation, today: NaiveDate) -> GoalProgress {
    let months = months_to_complete(allocation.amount_needed, allocation.allocated_monthly);
    let projected_completion = months.map(|m| add_months(today, m));

    let on_track = if allocation.amount_needed.is_zero() {
        true
    } else if allocation.allocated_monthly.is_zero() || allocation.deadline_at_risk {
        false
    } else {
        match (projected_completion, goal.target_date) {
            (Some(projected), Some(deadline)) => projected <= deadline,
            _ => true,
        }
    };

    GoalProgress {
        goal_id: goal.id.clone(),
        label: goal.label.clone(),
        priority: goal.priority,
        target_amount: goal.target_amount,
        saved_amount: goal.saved_amount,
        amount_needed: allocation.amount_needed,
        allocated_monthly: allocation.allocated_monthly,
        progress_percent: progress_percent(goal.saved_amount, goal.target_amount),
        months_to_complete: months,
        projected_completion,
        target_date: goal.target_date,
        on_track,
    }
}

/// Build the progress read-model from an allocation of `goals`
///
/// Goals are reported in allocation order. Allocations without a matching
/// goal are skipped.
pub fn goal_progress(
    savings: SavingsSummary,
    goals: &[Goal],
    matrix: &AllocationMatrix,
    today: NaiveDate,
) -> GoalProgressReport {
    let progress: Vec<GoalProgress> = matrix
        .allocations
        .iter()
        .filter_map(|allocation| {
            goals
                .iter()
                .find(|g| g.id == allocation.goal_id)
                .map(|goal| project(goal, allocation, today))
        })
        .collect();

    let tip = progress_tip(savings.monthly_income, &progress);

    GoalProgressReport {
        savings,
        savings_pool: matrix.savings_pool,
        unallocated: matrix.unallocated,
        total_target: goals.iter().map(|g| g.target_amount).sum(),
        total_saved: goals.iter().map(|g| g.saved_amount).sum(),
        goals: progress,
        tip,
    }
}

fn progress_tip(income: Money, goals: &[GoalProgress]) -> String {
    if !income.is_positive() {
        return "Set your income in preferences to see goal projections.".to_string();
    }
    if goals.is_empty() {
        return "Add savings goals to start planning your future!".to_string();
    }

    let behind: Vec<&str> = goals
        .iter()
        .filter(|g| !g.on_track)
        .take(MAX_BEHIND_IN_TIP)
        .map(|g| g.label.as_str())
        .collect();

    if behind.is_empty() {
        format!(
            "Great! You're on track for all {} goal(s). Keep it up!",
            goals.len()
        )
    } else {
        format!(
            "You're behind on: {}. Consider increasing savings.",
            behind.join(", ")
        )
    }
}

/// How pressing a goal's deadline is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalUrgency {
    OnTrack,
    Urgent,
}

impl GoalUrgency {
    pub fn from_months(months_remaining: u32) -> Self {
        if months_remaining > URGENT_MONTHS {
            Self::OnTrack
        } else {
            Self::Urgent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "on track",
            Self::Urgent => "urgent",
        }
    }
}

/// Monthly saving needed for one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRecommendation {
    pub goal_id: GoalId,
    pub label: String,
    pub amount_needed: Money,
    pub target_date: Option<NaiveDate>,
    pub monthly_needed: Money,
    pub months_remaining: u32,
    pub status: GoalUrgency,
}

/// What the goals ask of each month's budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAnalysis {
    pub has_goals: bool,
    pub total_monthly_needed: Money,
    pub goals: Vec<GoalRecommendation>,
    pub tip: String,
}

/// Per-goal savings recommendations from an allocation
///
/// Goals that need nothing more are left out.
pub fn budget_analysis(matrix: &AllocationMatrix) -> BudgetAnalysis {
    if matrix.allocations.is_empty() {
        return BudgetAnalysis {
            has_goals: false,
            total_monthly_needed: Money::zero(),
            goals: Vec::new(),
            tip: "No goals set. Add goals to get personalized budget recommendations."
                .to_string(),
        };
    }

    let goals: Vec<GoalRecommendation> = matrix
        .allocations
        .iter()
        .filter(|a| a.ideal_monthly.is_positive())
        .map(|a| GoalRecommendation {
            goal_id: a.goal_id.clone(),
            label: a.label.clone(),
            amount_needed: a.amount_needed,
            target_date: a.target_date,
            monthly_needed: a.ideal_monthly,
            months_remaining: a.months_remaining,
            status: GoalUrgency::from_months(a.months_remaining),
        })
        .collect();

    let total_monthly_needed: Money = goals.iter().map(|g| g.monthly_needed).sum();

    BudgetAnalysis {
        has_goals: true,
        total_monthly_needed,
        goals,
        tip: format!(
            "To reach your goals, aim to save {} per month.",
            total_monthly_needed
        ),
    }
}
