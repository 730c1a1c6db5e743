//! Monthly spending aggregation
//!
//! Groups a transaction snapshot by calendar month and category hierarchy.
//! Parent categories and the sub-categories inside each parent are sorted
//! by amount, largest first, with ties broken by ascending category id.
//! That ordering is part of the output contract.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use super::budget_status::{BudgetAssessment, BudgetStatus};
use super::taxonomy::CategoryTaxonomy;
use super::trend;
use crate::models::{CategoryId, Money, Month, Transaction};

/// Spend under one raw category inside a parent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcategoryAggregate {
    pub category_id: CategoryId,
    pub name: String,
    pub amount: Money,
    pub transaction_count: usize,
}

/// Spend rolled up to a top-level category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category_id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub amount: Money,
    pub transaction_count: usize,
    pub subcategories: Vec<SubcategoryAggregate>,
    /// Filled in by `BudgetStatusEngine::annotate`
    pub budget: Option<BudgetAssessment>,
}

impl CategoryAggregate {
    pub fn status(&self) -> Option<BudgetStatus> {
        self.budget.map(|b| b.status)
    }
}

/// A month of spending grouped by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month: Month,
    pub total_spent: Money,
    pub transaction_count: usize,
    pub categories: Vec<CategoryAggregate>,
    /// Percent change versus the prior month; `None` without prior data
    pub comparison_delta: Option<i64>,
}

impl MonthlyAggregate {
    /// An aggregate with no spending
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            total_spent: Money::zero(),
            transaction_count: 0,
            categories: Vec::new(),
            comparison_delta: None,
        }
    }

    /// First day of the month
    pub fn anchor_date(&self) -> NaiveDate {
        self.month.start_date()
    }

    /// The category with the largest spend
    pub fn top_category(&self) -> Option<&CategoryAggregate> {
        self.categories.first()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a parent category's aggregate
    pub fn category(&self, id: &CategoryId) -> Option<&CategoryAggregate> {
        self.categories.iter().find(|c| &c.category_id == id)
    }
}

#[derive(Default)]
struct Bucket {
    amount: Money,
    count: usize,
}

#[derive(Default)]
struct ParentBucket {
    total: Bucket,
    children: BTreeMap<CategoryId, Bucket>,
}

fn by_amount_desc(a: (Money, &CategoryId), b: (Money, &CategoryId)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

/// Aggregates transactions against a category taxonomy
#[derive(Debug, Clone, Copy)]
pub struct TransactionAggregator<'a> {
    taxonomy: &'a CategoryTaxonomy,
}

impl<'a> TransactionAggregator<'a> {
    pub fn new(taxonomy: &'a CategoryTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Aggregate the transactions that fall within `month`
    pub fn aggregate(&self, transactions: &[Transaction], month: Month) -> MonthlyAggregate {
        let mut parents: BTreeMap<CategoryId, ParentBucket> = BTreeMap::new();
        let mut transaction_count = 0;

        for txn in transactions.iter().filter(|t| month.contains(t.created_at)) {
            let raw = txn.category_or_other();
            let parent = self.taxonomy.parent_of(&raw);

            let bucket = parents.entry(parent.id.clone()).or_default();
            bucket.total.amount += txn.amount;
            bucket.total.count += 1;

            let child = bucket.children.entry(raw).or_default();
            child.amount += txn.amount;
            child.count += 1;

            transaction_count += 1;
        }

        let mut categories: Vec<CategoryAggregate> = parents
            .into_iter()
            .map(|(parent_id, bucket)| self.build_category(parent_id, bucket))
            .collect();

        categories.sort_by(|a, b| {
            by_amount_desc((a.amount, &a.category_id), (b.amount, &b.category_id))
        });

        let total_spent = categories.iter().map(|c| c.amount).sum();

        debug!(
            month = %month,
            transactions = transaction_count,
            categories = categories.len(),
            total = %total_spent,
            "aggregated month"
        );

        MonthlyAggregate {
            month,
            total_spent,
            transaction_count,
            categories,
            comparison_delta: None,
        }
    }

    /// Aggregate `month` and compare it with the month before
    ///
    /// The delta stays `None` when the prior month has no transactions.
    pub fn aggregate_with_prior(
        &self,
        transactions: &[Transaction],
        month: Month,
    ) -> MonthlyAggregate {
        let mut current = self.aggregate(transactions, month);

        let prior_month = month.prev();
        let prior: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| prior_month.contains(t.created_at))
            .collect();

        if !prior.is_empty() {
            let prior_total: Money = prior.iter().map(|t| t.amount).sum();
            current.comparison_delta = Some(trend::month_over_month(
                current.total_spent,
                prior_total,
            ));
        }

        current
    }

    fn build_category(&self, parent_id: CategoryId, bucket: ParentBucket) -> CategoryAggregate {
        let parent = self
            .taxonomy
            .get(&parent_id)
            .unwrap_or_else(|| self.taxonomy.other());

        let mut subcategories: Vec<SubcategoryAggregate> = bucket
            .children
            .into_iter()
            .map(|(raw, child)| SubcategoryAggregate {
                name: self.taxonomy.display_name(&raw),
                category_id: raw,
                amount: child.amount,
                transaction_count: child.count,
            })
            .collect();

        subcategories.sort_by(|a, b| {
            by_amount_desc((a.amount, &a.category_id), (b.amount, &b.category_id))
        });

        CategoryAggregate {
            category_id: parent.id.clone(),
            name: parent.name.clone(),
            icon: parent.icon.clone(),
            color: parent.color.clone(),
            amount: bucket.total.amount,
            transaction_count: bucket.total.count,
            subcategories,
            budget: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn txn(amount: i64, category: Option<&str>, y: i32, m: u32, d: u32) -> Transaction {
        Transaction::new(
            Money::from_minor(amount),
            category.map(CategoryId::from),
            Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap(),
        )
    }

    fn jan() -> Month {
        Month::new(2025, 1).unwrap()
    }

    #[test]
    fn test_empty_snapshot() {
        let taxonomy = CategoryTaxonomy::default();
        let aggregate = TransactionAggregator::new(&taxonomy).aggregate(&[], jan());

        assert_eq!(aggregate.total_spent, Money::zero());
        assert!(aggregate.categories.is_empty());
        assert_eq!(aggregate.comparison_delta, None);
        assert_eq!(aggregate, MonthlyAggregate::empty(jan()));
    }

    #[test]
    fn test_groups_by_parent_and_subcategory() {
        let taxonomy = CategoryTaxonomy::default();
        let transactions = vec![
            txn(4_000, Some("food_delivery"), 2025, 1, 3),
            txn(6_000, Some("groceries"), 2025, 1, 4),
            txn(1_500, Some("food_delivery"), 2025, 1, 9),
            txn(3_000, Some("transport"), 2025, 1, 10),
        ];

        let aggregate = TransactionAggregator::new(&taxonomy).aggregate(&transactions, jan());

        assert_eq!(aggregate.total_spent, Money::from_minor(14_500));
        assert_eq!(aggregate.transaction_count, 4);
        assert_eq!(aggregate.categories.len(), 2);

        let food = &aggregate.categories[0];
        assert_eq!(food.category_id.as_str(), "food");
        assert_eq!(food.amount, Money::from_minor(11_500));
        assert_eq!(food.transaction_count, 3);
        assert_eq!(food.subcategories[0].category_id.as_str(), "groceries");
        assert_eq!(food.subcategories[1].category_id.as_str(), "food_delivery");
        assert_eq!(food.subcategories[1].transaction_count, 2);
        assert_eq!(food.subcategories[1].name, "Food Delivery");
    }

    #[test]
    fn test_filters_to_month_window() {
        let taxonomy = CategoryTaxonomy::default();
        let transactions = vec![
            txn(1_000, Some("shopping"), 2024, 12, 31),
            txn(2_000, Some("shopping"), 2025, 1, 1),
            txn(4_000, Some("shopping"), 2025, 2, 1),
        ];

        let aggregate = TransactionAggregator::new(&taxonomy).aggregate(&transactions, jan());
        assert_eq!(aggregate.total_spent, Money::from_minor(2_000));
        assert_eq!(aggregate.transaction_count, 1);
    }

    #[test]
    fn test_unknown_and_missing_categories_roll_up_to_other() {
        let taxonomy = CategoryTaxonomy::default();
        let transactions = vec![
            txn(700, Some("pets"), 2025, 1, 2),
            txn(300, None, 2025, 1, 2),
        ];

        let aggregate = TransactionAggregator::new(&taxonomy).aggregate(&transactions, jan());
        assert_eq!(aggregate.categories.len(), 1);

        let other = &aggregate.categories[0];
        assert_eq!(other.category_id.as_str(), "other");
        assert_eq!(other.amount, Money::from_minor(1_000));
        assert_eq!(other.subcategories[0].category_id.as_str(), "pets");
        assert_eq!(other.subcategories[0].name, "pets");
        assert_eq!(other.subcategories[1].category_id.as_str(), "other");
    }

    #[test]
    fn test_ties_break_by_category_id() {
        let taxonomy = CategoryTaxonomy::default();
        let transactions = vec![
            txn(5_000, Some("transport"), 2025, 1, 2),
            txn(5_000, Some("health"), 2025, 1, 2),
            txn(5_000, Some("bills"), 2025, 1, 2),
        ];

        let aggregate = TransactionAggregator::new(&taxonomy).aggregate(&transactions, jan());
        let order: Vec<_> = aggregate
            .categories
            .iter()
            .map(|c| c.category_id.as_str())
            .collect();
        assert_eq!(order, vec!["bills", "health", "transport"]);
    }

    #[test]
    fn test_refunds_pass_through() {
        let taxonomy = CategoryTaxonomy::default();
        let transactions = vec![
            txn(2_000, Some("shopping"), 2025, 1, 2),
            txn(-5_000, Some("shopping"), 2025, 1, 3),
        ];

        let aggregate = TransactionAggregator::new(&taxonomy).aggregate(&transactions, jan());
        assert_eq!(aggregate.total_spent, Money::from_minor(-3_000));
        assert_eq!(aggregate.categories[0].amount, Money::from_minor(-3_000));
    }

    #[test]
    fn test_prior_month_delta() {
        let taxonomy = CategoryTaxonomy::default();
        let transactions = vec![
            txn(10_000, Some("shopping"), 2024, 12, 15),
            txn(8_000, Some("shopping"), 2025, 1, 15),
        ];

        let aggregate =
            TransactionAggregator::new(&taxonomy).aggregate_with_prior(&transactions, jan());
        assert_eq!(aggregate.comparison_delta, Some(-20));
    }

    #[test]
    fn test_no_prior_data_leaves_delta_empty() {
        let taxonomy = CategoryTaxonomy::default();
        let transactions = vec![txn(8_000, Some("shopping"), 2025, 1, 15)];

        let aggregate =
            TransactionAggregator::new(&taxonomy).aggregate_with_prior(&transactions, jan());
        assert_eq!(aggregate.comparison_delta, None);
    }
}
