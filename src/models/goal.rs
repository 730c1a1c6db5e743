//! Savings goal model
//!
//! Goals are owned by the external collaborator. The engine reads them to
//! plan monthly contributions and never persists them itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;
use super::period::months_between;

/// Priority assigned to goals that arrive without one
pub const DEFAULT_PRIORITY: u32 = 999;

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

/// A user-defined savings target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,

    pub label: String,

    /// Lower number = funded first
    #[serde(default = "default_priority")]
    pub priority: u32,

    pub target_amount: Money,

    /// Optional deadline
    #[serde(default)]
    pub target_date: Option<NaiveDate>,

    /// Amount already put aside
    #[serde(default, alias = "current_saved")]
    pub saved_amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Goal {
    /// Create a goal with nothing saved and no deadline
    pub fn new(id: impl Into<GoalId>, label: impl Into<String>, priority: u32, target_amount: Money) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            priority,
            target_amount,
            target_date: None,
            saved_amount: Money::zero(),
            icon: None,
            color: None,
        }
    }

    /// Set a deadline
    pub fn with_deadline(mut self, target_date: NaiveDate) -> Self {
        self.target_date = Some(target_date);
        self
    }

    /// Set the amount already saved
    pub fn with_saved(mut self, saved_amount: Money) -> Self {
        self.saved_amount = saved_amount;
        self
    }

    /// Amount still needed to reach the target (never negative)
    pub fn amount_needed(&self) -> Money {
        (self.target_amount - self.saved_amount).non_negative()
    }

    /// Whole months left until the deadline, floored at 1
    ///
    /// Returns `None` for goals without a deadline.
    pub fn months_remaining(&self, today: NaiveDate) -> Option<u32> {
        self.target_date
            .map(|deadline| months_between(today, deadline).max(1) as u32)
    }

    /// Record a contribution toward the goal
    pub fn add_savings(&mut self, amount: Money) {
        self.saved_amount += amount;
    }

    /// Check if the goal has been reached
    pub fn is_complete(&self) -> bool {
        self.amount_needed().is_zero()
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.label.trim().is_empty() {
            return Err(GoalValidationError::EmptyLabel);
        }

        if self.target_amount.is_negative() {
            return Err(GoalValidationError::NegativeTarget);
        }

        if self.saved_amount.is_negative() {
            return Err(GoalValidationError::NegativeSaved);
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target_date {
            Some(date) => write!(
                f,
                "{} ({} by {})",
                self.label,
                self.target_amount,
                date.format("%Y-%m-%d")
            ),
            None => write!(f, "{} ({})", self.label, self.target_amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyLabel,
    NegativeTarget,
    NegativeSaved,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "Goal label cannot be empty"),
            Self::NegativeTarget => write!(f, "Goal target cannot be negative"),
            Self::NegativeSaved => write!(f, "Saved amount cannot be negative"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_amount_needed() {
        let goal = Goal::new("laptop", "Laptop", 1, Money::from_major(80_000))
            .with_saved(Money::from_major(20_000));
        assert_eq!(goal.amount_needed(), Money::from_major(60_000));

        let overfunded = goal.clone().with_saved(Money::from_major(90_000));
        assert_eq!(overfunded.amount_needed(), Money::zero());
        assert!(overfunded.is_complete());
    }

    #[test]
    fn test_months_remaining_floors_at_one() {
        let today = date(2025, 3, 20);
        let goal = Goal::new("trip", "Trip", 2, Money::from_major(50_000));
        assert_eq!(goal.months_remaining(today), None);

        let soon = goal.clone().with_deadline(date(2025, 3, 31));
        assert_eq!(soon.months_remaining(today), Some(1));

        let past = goal.clone().with_deadline(date(2024, 12, 1));
        assert_eq!(past.months_remaining(today), Some(1));

        let later = goal.with_deadline(date(2025, 9, 1));
        assert_eq!(later.months_remaining(today), Some(6));
    }

    #[test]
    fn test_add_savings() {
        let mut goal = Goal::new("fund", "Emergency Fund", 1, Money::from_major(1_000));
        goal.add_savings(Money::from_major(250));
        assert_eq!(goal.saved_amount, Money::from_major(250));
    }

    #[test]
    fn test_validation() {
        let goal = Goal::new("fund", "Emergency Fund", 1, Money::from_major(1_000));
        assert!(goal.validate().is_ok());

        let mut bad = goal.clone();
        bad.label = " ".into();
        assert_eq!(bad.validate(), Err(GoalValidationError::EmptyLabel));

        let mut bad = goal;
        bad.target_amount = Money::from_minor(-1);
        assert_eq!(bad.validate(), Err(GoalValidationError::NegativeTarget));
    }

    #[test]
    fn test_deserialize_mobile_shape() {
        let json = r#"{
            "id": "g-1",
            "label": "New Bike",
            "target_amount": 1500000,
            "target_date": "2025-12-31",
            "current_saved": 250000
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.priority, DEFAULT_PRIORITY);
        assert_eq!(goal.saved_amount.minor(), 250000);
        assert_eq!(goal.target_date, Some(date(2025, 12, 31)));
    }
}
