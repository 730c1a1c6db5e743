//! Spending analytics and goal allocation
//!
//! Every type here is a pure function of its inputs: snapshots go in,
//! freshly built view-models come out, and nothing is cached between calls.

pub mod aggregator;
pub mod allocation;
pub mod budget_status;
pub mod insights;
pub mod progress;
pub mod taxonomy;
pub mod trend;

pub use aggregator::{
    CategoryAggregate, MonthlyAggregate, SubcategoryAggregate, TransactionAggregator,
};
pub use allocation::{AllocationMatrix, GoalAllocation, GoalAllocationEngine};
pub use budget_status::{BudgetAssessment, BudgetStatus, BudgetStatusEngine};
pub use insights::{
    DayProgress, HeadlineRule, Insight, InsightContext, InsightGenerator, InsightReport,
    InsightRule, TipRule,
};
pub use progress::{
    budget_analysis, goal_progress, BudgetAnalysis, GoalProgress, GoalProgressReport,
    GoalRecommendation, GoalUrgency, SavingsSummary,
};
pub use taxonomy::CategoryTaxonomy;
pub use trend::month_over_month;
