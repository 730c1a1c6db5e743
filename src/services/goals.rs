//! Goal service
//!
//! Reads goals from the external store and runs the allocation engine over
//! them. Reads degrade to an empty goal list when the store fails; writes
//! are passed through to the store and their errors returned.

use chrono::NaiveDate;
use tracing::{info, warn};

use serde::Serialize;

use crate::analytics::{
    budget_analysis, goal_progress, AllocationMatrix, BudgetAnalysis, GoalAllocationEngine,
    GoalProgressReport, SavingsSummary,
};
use crate::config::EngineSettings;
use crate::error::FiscallyResult;
use crate::models::{Goal, GoalId, Money, Profile};
use crate::storage::GoalStore;

/// Allocation, progress and recommendations built from one goal snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub allocation: AllocationMatrix,
    pub progress: GoalProgressReport,
    pub analysis: BudgetAnalysis,
}

/// Service for goal planning
pub struct GoalService<'a> {
    store: &'a dyn GoalStore,
    engine: GoalAllocationEngine,
}

impl<'a> GoalService<'a> {
    pub fn new(store: &'a dyn GoalStore, settings: &EngineSettings) -> Self {
        Self {
            store,
            engine: GoalAllocationEngine::from_settings(settings),
        }
    }

    fn snapshot(&self) -> Vec<Goal> {
        self.store.list_goals().unwrap_or_else(|e| {
            warn!(error = %e, "goal store failed, using empty goal list");
            Vec::new()
        })
    }

    /// Allocate the profile's savings pool across the stored goals
    pub fn allocate(&self, profile: &Profile, today: NaiveDate) -> AllocationMatrix {
        let goals = self.snapshot();
        self.engine
            .allocate(profile.income(), profile.budget(), &goals, today)
    }

    /// Every goal read-model from a single read of the store
    ///
    /// `monthly_expenses` is the spend recorded so far this month.
    pub fn plan(&self, profile: &Profile, monthly_expenses: Money, today: NaiveDate) -> GoalPlan {
        let goals = self.snapshot();
        let income = profile.income();
        let budget = profile.budget();

        let allocation = self.engine.allocate(income, budget, &goals, today);
        let progress = goal_progress(
            SavingsSummary::new(income, budget, monthly_expenses),
            &goals,
            &allocation,
            today,
        );
        let analysis = budget_analysis(&allocation);

        GoalPlan {
            allocation,
            progress,
            analysis,
        }
    }

    /// Record a contribution toward a goal
    pub fn save_to_goal(&self, goal_id: &GoalId, amount: Money) -> FiscallyResult<Goal> {
        let goal = self.store.save_to_goal(goal_id, amount)?;
        info!(goal = %goal.id, amount = %amount, saved = %goal.saved_amount, "saved to goal");
        Ok(goal)
    }

    /// Replace the stored goals
    pub fn sync_goals(&self, goals: Vec<Goal>) -> FiscallyResult<usize> {
        let count = self.store.sync_goals(goals)?;
        info!(goals = count, "synced goals");
        Ok(count)
    }
}
