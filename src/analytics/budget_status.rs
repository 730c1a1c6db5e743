//! Budget health classification
//!
//! Every category is measured against the same apportioned ceiling
//! (`monthly budget × category_budget_ratio`, a quarter by default).
//! Thresholds are checked in order and the first match wins.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::aggregator::MonthlyAggregate;
use crate::config::EngineSettings;
use crate::models::Money;

/// Progress at or above which a category is over budget
pub const OVER_BUDGET_THRESHOLD: f64 = 90.0;
/// Progress at or above which a category is near its limit
pub const NEAR_LIMIT_THRESHOLD: f64 = 75.0;
/// Progress at or below which spending is considered low
pub const LOW_SPEND_THRESHOLD: f64 = 30.0;

/// Budget health of a single category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BudgetStatus {
    #[serde(rename = "Over Budget")]
    OverBudget,
    #[serde(rename = "Near Limit")]
    NearLimit,
    #[serde(rename = "Low Spend")]
    LowSpend,
    #[serde(rename = "On Track")]
    OnTrack,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OverBudget => "Over Budget",
            Self::NearLimit => "Near Limit",
            Self::LowSpend => "Low Spend",
            Self::OnTrack => "On Track",
        }
    }

    /// Over budget or near the limit
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::OverBudget | Self::NearLimit)
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a progress percentage
pub fn classify(progress: f64) -> BudgetStatus {
    if progress >= OVER_BUDGET_THRESHOLD {
        BudgetStatus::OverBudget
    } else if progress >= NEAR_LIMIT_THRESHOLD {
        BudgetStatus::NearLimit
    } else if progress <= LOW_SPEND_THRESHOLD {
        BudgetStatus::LowSpend
    } else {
        BudgetStatus::OnTrack
    }
}

/// Spend as a percentage of a ceiling
///
/// A ceiling of zero or less yields `+inf` for positive spend and `0`
/// otherwise.
pub fn progress_percent(amount: Money, ceiling: Money) -> f64 {
    if !ceiling.is_positive() {
        return if amount.is_positive() { f64::INFINITY } else { 0.0 };
    }
    // multiply first so exact thresholds stay exact
    (amount.as_f64() * 100.0) / ceiling.as_f64()
}

/// Linear run-rate projection of month-end spend
///
/// `day_of_month` of zero is treated as one.
pub fn project_month_end(spent: Money, day_of_month: u32, days_in_month: u32) -> Money {
    let elapsed = day_of_month.max(1) as f64;
    Money::from_f64_rounded(spent.as_f64() / elapsed * days_in_month as f64)
}

/// Budget evaluation of one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetAssessment {
    /// The apportioned ceiling the category was measured against
    pub ceiling: Money,
    /// Raw, uncapped progress percentage
    pub progress: f64,
    pub status: BudgetStatus,
}

impl BudgetAssessment {
    /// Progress clamped to `0..=100` for gauges
    pub fn display_progress(&self) -> f64 {
        if !self.ceiling.is_positive() {
            return 100.0;
        }
        if self.progress.is_nan() {
            return 0.0;
        }
        self.progress.clamp(0.0, 100.0)
    }
}

/// Classifies category spend against an apportioned budget ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatusEngine {
    monthly_budget: Money,
    category_ratio: f64,
}

impl BudgetStatusEngine {
    /// Default share of the monthly budget per category
    pub const DEFAULT_CATEGORY_RATIO: f64 = 0.25;

    pub fn new(monthly_budget: Money, category_ratio: f64) -> Self {
        Self {
            monthly_budget,
            category_ratio,
        }
    }

    pub fn from_settings(monthly_budget: Money, settings: &EngineSettings) -> Self {
        Self::new(monthly_budget, settings.category_budget_ratio)
    }

    pub fn monthly_budget(&self) -> Money {
        self.monthly_budget
    }

    /// The per-category ceiling
    pub fn category_ceiling(&self) -> Money {
        Money::from_f64_rounded(self.monthly_budget.as_f64() * self.category_ratio)
    }

    /// Evaluate one category's spend
    pub fn assess(&self, amount: Money) -> BudgetAssessment {
        let ceiling = self.category_ceiling();
        let progress = progress_percent(amount, ceiling);

        let status = if ceiling.is_positive() {
            classify(progress)
        } else {
            BudgetStatus::OverBudget
        };

        BudgetAssessment {
            ceiling,
            progress,
            status,
        }
    }

    /// Attach an assessment to every category of an aggregate
    pub fn annotate(&self, mut aggregate: MonthlyAggregate) -> MonthlyAggregate {
        for category in &mut aggregate.categories {
            let assessment = self.assess(category.amount);
            debug!(
                category = %category.category_id,
                progress = assessment.progress,
                status = %assessment.status,
                "assessed category budget"
            );
            category.budget = Some(assessment);
        }
        aggregate
    }
}
