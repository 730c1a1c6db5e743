//! Financial profile
//!
//! Income and planned spending supplied by the caller. During onboarding
//! users may only pick a bracket instead of an exact figure; brackets resolve
//! to a representative amount when no explicit value is present.

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Monthly income bracket chosen during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalaryRange {
    #[serde(rename = "below_30k")]
    Below30k,
    #[serde(rename = "30k_75k")]
    From30kTo75k,
    #[serde(rename = "75k_150k")]
    From75kTo150k,
    #[serde(rename = "above_150k")]
    Above150k,
    #[serde(rename = "prefer_not")]
    PreferNot,
}

impl SalaryRange {
    /// Representative monthly income for the bracket
    pub fn approximate(&self) -> Option<Money> {
        match self {
            Self::Below30k => Some(Money::from_major(25_000)),
            Self::From30kTo75k => Some(Money::from_major(52_500)),
            Self::From75kTo150k => Some(Money::from_major(112_500)),
            Self::Above150k => Some(Money::from_major(200_000)),
            Self::PreferNot => None,
        }
    }
}

/// Monthly budget bracket chosen during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "below_20k")]
    Below20k,
    #[serde(rename = "20k_40k")]
    From20kTo40k,
    #[serde(rename = "40k_70k")]
    From40kTo70k,
    #[serde(rename = "70k_100k")]
    From70kTo100k,
    #[serde(rename = "above_100k")]
    Above100k,
}

impl BudgetRange {
    /// Representative monthly budget for the bracket
    pub fn approximate(&self) -> Money {
        match self {
            Self::Below20k => Money::from_major(15_000),
            Self::From20kTo40k => Money::from_major(30_000),
            Self::From40kTo70k => Money::from_major(55_000),
            Self::From70kTo100k => Money::from_major(85_000),
            Self::Above100k => Money::from_major(120_000),
        }
    }
}

/// Income and budget preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<BudgetRange>,
}

impl Profile {
    /// Create a profile with explicit figures
    pub fn new(monthly_income: Money, monthly_budget: Money) -> Self {
        Self {
            monthly_income: Some(monthly_income),
            monthly_budget: Some(monthly_budget),
            salary_range: None,
            budget_range: None,
        }
    }

    /// Effective monthly income (zero when unknown)
    pub fn income(&self) -> Money {
        self.monthly_income
            .or_else(|| self.salary_range.and_then(|r| r.approximate()))
            .unwrap_or_default()
    }

    /// Effective monthly budget (zero when unknown)
    pub fn budget(&self) -> Money {
        self.monthly_budget
            .or_else(|| self.budget_range.map(|r| r.approximate()))
            .unwrap_or_default()
    }

    /// Check if any income figure is available
    pub fn has_income(&self) -> bool {
        self.income().is_positive()
    }
}
