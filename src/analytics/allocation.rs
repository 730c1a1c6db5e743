//! Priority-first goal allocation
//!
//! The monthly savings pool (`income - budget`) is walked through the goals
//! in ascending priority order. Each goal takes `min(ideal, remaining)`, so a
//! goal is only short if every goal ahead of it was fully funded.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineSettings;
use crate::models::{Goal, GoalId, Money};

/// Allocation for a single goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalAllocation {
    pub goal_id: GoalId,
    pub label: String,
    pub priority: u32,
    pub target_date: Option<NaiveDate>,
    /// Target minus saved, never negative
    pub amount_needed: Money,
    /// Months the ideal contribution is spread over
    pub months_remaining: u32,
    pub ideal_monthly: Money,
    pub allocated_monthly: Money,
    pub is_underfunded: bool,
    pub deadline_at_risk: bool,
}

impl GoalAllocation {
    /// Gap between the ideal and the allocated contribution
    pub fn gap(&self) -> Money {
        (self.ideal_monthly - self.allocated_monthly).non_negative()
    }
}

/// Distribution of a monthly savings pool across goals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationMatrix {
    /// Sum of ideal monthly contributions
    pub total_needed: Money,
    /// Pool available for allocation (never negative)
    pub total_available: Money,
    /// Raw `income - budget`; negative when the budget exceeds income
    pub savings_pool: Money,
    pub shortfall: Money,
    pub budget_exceeded: bool,
    /// Pool left after every goal took its share
    pub unallocated: Money,
    /// Goals in allocation order
    pub allocations: Vec<GoalAllocation>,
}

impl AllocationMatrix {
    pub fn total_allocated(&self) -> Money {
        self.allocations.iter().map(|a| a.allocated_monthly).sum()
    }

    pub fn underfunded(&self) -> impl Iterator<Item = &GoalAllocation> {
        self.allocations.iter().filter(|a| a.is_underfunded)
    }

    pub fn get(&self, goal_id: &GoalId) -> Option<&GoalAllocation> {
        self.allocations.iter().find(|a| &a.goal_id == goal_id)
    }
}

/// Ideal monthly contribution, rounded up to the next minor unit
pub fn ideal_monthly(amount_needed: Money, months: u32) -> Money {
    let needed = amount_needed.non_negative().minor();
    let months = i64::from(months.max(1));
    Money::from_minor((needed + months - 1) / months)
}

/// Distributes a monthly savings pool across prioritized goals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalAllocationEngine {
    default_horizon_months: u32,
}

impl Default for GoalAllocationEngine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HORIZON_MONTHS)
    }
}

impl GoalAllocationEngine {
    /// Horizon used for goals without a deadline
    pub const DEFAULT_HORIZON_MONTHS: u32 = 12;

    pub fn new(default_horizon_months: u32) -> Self {
        Self {
            default_horizon_months: default_horizon_months.max(1),
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.default_goal_horizon_months)
    }

    pub fn default_horizon_months(&self) -> u32 {
        self.default_horizon_months
    }

    /// Allocate `income - budget` across `goals`
    ///
    /// Goals with equal priority keep their input order.
    pub fn allocate(
        &self,
        income: Money,
        budget: Money,
        goals: &[Goal],
        today: NaiveDate,
    ) -> AllocationMatrix {
        let savings_pool = income - budget;
        let budget_exceeded = savings_pool.is_negative();
        let total_available = savings_pool.non_negative();

        let mut ordered: Vec<&Goal> = goals.iter().collect();
        ordered.sort_by_key(|g| g.priority);

        let mut remaining = total_available;
        let mut allocations = Vec::with_capacity(ordered.len());

        for goal in ordered {
            let amount_needed = goal.amount_needed();
            let months_remaining = goal
                .months_remaining(today)
                .unwrap_or(self.default_horizon_months);
            let ideal = ideal_monthly(amount_needed, months_remaining);

            let allocated = if budget_exceeded {
                Money::zero()
            } else {
                ideal.min(remaining)
            };
            remaining -= allocated;

            let is_underfunded = budget_exceeded || allocated < ideal;
            let deadline_at_risk = is_underfunded
                && goal.target_date.is_some()
                && allocated.minor() * i64::from(months_remaining) < amount_needed.minor();

            allocations.push(GoalAllocation {
                goal_id: goal.id.clone(),
                label: goal.label.clone(),
                priority: goal.priority,
                target_date: goal.target_date,
                amount_needed,
                months_remaining,
                ideal_monthly: ideal,
                allocated_monthly: allocated,
                is_underfunded,
                deadline_at_risk,
            });
        }

        let total_needed: Money = allocations.iter().map(|a| a.ideal_monthly).sum();
        let shortfall = (total_needed - total_available).non_negative();

        debug!(
            goals = allocations.len(),
            pool = %savings_pool,
            needed = %total_needed,
            shortfall = %shortfall,
            budget_exceeded,
            "allocated savings pool"
        );

        AllocationMatrix {
            total_needed,
            total_available,
            savings_pool,
            shortfall,
            budget_exceeded,
            unallocated: remaining,
            allocations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn goal(id: &str, priority: u32, target: i64) -> Goal {
        Goal::new(id, id.to_uppercase(), priority, Money::from_minor(target))
    }

    #[test]
    fn test_shortfall_scenario() {
        // 12-month horizon: 240,000 -> 20,000/mo, 180,000 -> 15,000/mo
        let goals = vec![goal("laptop", 1, 240_000), goal("trip", 2, 180_000)];
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(80_000),
            Money::from_minor(50_000),
            &goals,
            today(),
        );

        assert_eq!(matrix.total_available, Money::from_minor(30_000));
        assert_eq!(matrix.total_needed, Money::from_minor(35_000));
        assert_eq!(matrix.shortfall, Money::from_minor(5_000));
        assert!(!matrix.budget_exceeded);

        let first = &matrix.allocations[0];
        assert_eq!(first.allocated_monthly, Money::from_minor(20_000));
        assert!(!first.is_underfunded);

        let second = &matrix.allocations[1];
        assert_eq!(second.ideal_monthly, Money::from_minor(15_000));
        assert_eq!(second.allocated_monthly, Money::from_minor(10_000));
        assert!(second.is_underfunded);
        assert!(!second.deadline_at_risk);
        assert_eq!(matrix.unallocated, Money::zero());
    }

    #[test]
    fn test_sorted_by_priority_with_stable_ties() {
        let goals = vec![
            goal("c", 3, 1_200),
            goal("a1", 1, 1_200),
            goal("b", 2, 1_200),
            goal("a2", 1, 1_200),
        ];
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(1_000),
            Money::zero(),
            &goals,
            today(),
        );
        let order: Vec<_> = matrix.allocations.iter().map(|a| a.goal_id.as_str()).collect();
        assert_eq!(order, vec!["a1", "a2", "b", "c"]);
    }

    #[test]
    fn test_budget_exceeded_allocates_nothing() {
        let goals = vec![goal("fund", 1, 12_000), goal("done", 2, 0)];
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(40_000),
            Money::from_minor(45_000),
            &goals,
            today(),
        );

        assert!(matrix.budget_exceeded);
        assert_eq!(matrix.savings_pool, Money::from_minor(-5_000));
        assert_eq!(matrix.total_available, Money::zero());
        assert_eq!(matrix.total_allocated(), Money::zero());
        assert!(matrix.allocations.iter().all(|a| a.is_underfunded));
        assert_eq!(matrix.shortfall, Money::from_minor(1_000));
    }

    #[test]
    fn test_surplus_is_unallocated() {
        let goals = vec![goal("fund", 1, 12_000)];
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(5_000),
            Money::zero(),
            &goals,
            today(),
        );
        assert_eq!(matrix.total_allocated(), Money::from_minor(1_000));
        assert_eq!(matrix.unallocated, Money::from_minor(4_000));
        assert_eq!(matrix.shortfall, Money::zero());
    }

    #[test]
    fn test_deadline_drives_ideal() {
        // Jan 15 -> Jul 1 is 6 months; 10,000 needed
        let g = goal("bike", 1, 12_000)
            .with_saved(Money::from_minor(2_000))
            .with_deadline(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(100_000),
            Money::zero(),
            &[g],
            today(),
        );
        let a = &matrix.allocations[0];
        assert_eq!(a.months_remaining, 6);
        assert_eq!(a.amount_needed, Money::from_minor(10_000));
        assert_eq!(a.ideal_monthly, Money::from_minor(1_667));
    }

    #[test]
    fn test_deadline_at_risk() {
        let g = goal("bike", 1, 6_000).with_deadline(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(1_000),
            Money::zero(),
            &[g],
            today(),
        );
        let a = &matrix.allocations[0];
        assert_eq!(a.ideal_monthly, Money::from_minor(2_000));
        assert!(a.is_underfunded);
        assert!(a.deadline_at_risk);
    }

    #[test]
    fn test_reached_goal_needs_nothing() {
        let g = goal("fund", 1, 5_000).with_saved(Money::from_minor(7_000));
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(1_000),
            Money::zero(),
            &[g],
            today(),
        );
        let a = &matrix.allocations[0];
        assert_eq!(a.ideal_monthly, Money::zero());
        assert_eq!(a.allocated_monthly, Money::zero());
        assert!(!a.is_underfunded);
    }

    #[test]
    fn test_no_goals() {
        let matrix = GoalAllocationEngine::default().allocate(
            Money::from_minor(10_000),
            Money::from_minor(4_000),
            &[],
            today(),
        );
        assert!(matrix.allocations.is_empty());
        assert_eq!(matrix.total_needed, Money::zero());
        assert_eq!(matrix.unallocated, Money::from_minor(6_000));
    }

    #[test]
    fn test_ideal_monthly_rounds_up() {
        assert_eq!(ideal_monthly(Money::from_minor(100), 3), Money::from_minor(34));
        assert_eq!(ideal_monthly(Money::from_minor(99), 3), Money::from_minor(33));
        assert_eq!(ideal_monthly(Money::from_minor(50), 0), Money::from_minor(50));
    }
}
