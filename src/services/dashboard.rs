//! Dashboard service
//!
//! Fetches a fresh transaction snapshot and runs it through aggregation,
//! budget classification, trend comparison and insight selection. A failing
//! transaction source is logged and treated as an empty snapshot.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::refresh::RecomputeTrigger;
use crate::analytics::budget_status::project_month_end;
use crate::analytics::{
    BudgetStatusEngine, CategoryTaxonomy, DayProgress, InsightContext, InsightGenerator,
    InsightReport, MonthlyAggregate, TransactionAggregator,
};
use crate::config::EngineSettings;
use crate::models::{Money, Month, Profile, Transaction};
use crate::storage::{fetch_all, TransactionSource};

/// Everything the spending screen shows for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub month: Month,
    pub trigger: RecomputeTrigger,
    pub monthly_budget: Money,
    pub aggregate: MonthlyAggregate,
    pub day: DayProgress,
    pub projected_month_end: Money,
    pub insights: InsightReport,
}

impl Dashboard {
    /// Budget left for the month (negative when overspent)
    pub fn remaining_budget(&self) -> Money {
        self.monthly_budget - self.aggregate.total_spent
    }
}

/// Recomputes the spending dashboard on demand
pub struct DashboardService<'a> {
    source: &'a dyn TransactionSource,
    taxonomy: &'a CategoryTaxonomy,
    settings: &'a EngineSettings,
    generator: InsightGenerator,
}

impl<'a> DashboardService<'a> {
    pub fn new(
        source: &'a dyn TransactionSource,
        taxonomy: &'a CategoryTaxonomy,
        settings: &'a EngineSettings,
    ) -> Self {
        Self {
            source,
            taxonomy,
            settings,
            generator: InsightGenerator::default(),
        }
    }

    /// Use a custom insight generator
    pub fn with_generator(mut self, generator: InsightGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Transactions for `month` and the month before it
    fn snapshot(&self, month: Month) -> Vec<Transaction> {
        let range = month.prev().range().union(&month.range());
        match fetch_all(self.source, range) {
            Ok(transactions) => transactions,
            Err(e) => {
                warn!(month = %month, error = %e, "transaction source failed, using empty snapshot");
                Vec::new()
            }
        }
    }

    /// Build the dashboard for `month` as seen on `today`
    pub fn recompute(
        &self,
        trigger: RecomputeTrigger,
        profile: &Profile,
        month: Month,
        today: NaiveDate,
    ) -> Dashboard {
        let monthly_budget = profile.budget();
        let transactions = self.snapshot(month);

        debug!(
            trigger = %trigger,
            month = %month,
            transactions = transactions.len(),
            "recomputing dashboard"
        );

        let aggregate =
            TransactionAggregator::new(self.taxonomy).aggregate_with_prior(&transactions, month);
        let aggregate =
            BudgetStatusEngine::from_settings(monthly_budget, self.settings).annotate(aggregate);

        let day = DayProgress::for_month(month, today);
        let projected_month_end =
            project_month_end(aggregate.total_spent, day.day_of_month, day.days_in_month);

        let ctx = InsightContext::new(&aggregate, day, monthly_budget, self.settings);
        let insights = self.generator.generate(&ctx);

        Dashboard {
            month,
            trigger,
            monthly_budget,
            aggregate,
            day,
            projected_month_end,
            insights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::insights::{Rendered, BUDGET_ALERT, START_TRACKING};
    use crate::analytics::InsightRule;
    use crate::error::{FiscallyError, FiscallyResult};
    use crate::services::refresh::RefreshTopic;
    use crate::storage::{TransactionPage, TransactionQuery};
    use chrono::{TimeZone, Utc};

    struct FixedSource(Vec<Transaction>);

    impl TransactionSource for FixedSource {
        fn list_transactions(&self, query: &TransactionQuery) -> FiscallyResult<TransactionPage> {
            let matching: Vec<_> = self.0.iter().filter(|t| query.matches(t)).cloned().collect();
            Ok(TransactionPage {
                total: matching.len(),
                limit: query.limit,
                offset: query.offset,
                has_more: false,
                transactions: matching,
            })
        }
    }

    struct OfflineSource;

    impl TransactionSource for OfflineSource {
        fn list_transactions(&self, _query: &TransactionQuery) -> FiscallyResult<TransactionPage> {
            Err(FiscallyError::Source("network unreachable".into()))
        }
    }

    fn jan() -> Month {
        Month::new(2025, 1).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn profile() -> Profile {
        Profile::new(Money::from_minor(80_000), Money::from_minor(50_000))
    }

    fn txn(amount: i64, category: &str, y: i32, m: u32, d: u32) -> Transaction {
        Transaction::new(
            Money::from_minor(amount),
            Some(category.into()),
            Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_failing_source_degrades_to_empty() {
        let taxonomy = CategoryTaxonomy::default();
        let settings = EngineSettings::default();
        let service = DashboardService::new(&OfflineSource, &taxonomy, &settings);

        let dashboard = service.recompute(RecomputeTrigger::Refresh, &profile(), jan(), day(10));
        assert!(dashboard.aggregate.is_empty());
        assert_eq!(dashboard.insights.headline.rule, START_TRACKING);
        assert_eq!(dashboard.projected_month_end, Money::zero());
    }

    #[test]
    fn test_over_budget_category_dashboard() {
        let source = FixedSource(vec![txn(12_000, "shopping", 2025, 1, 3)]);
        let taxonomy = CategoryTaxonomy::default();
        let settings = EngineSettings::default();
        let service = DashboardService::new(&source, &taxonomy, &settings);

        let dashboard = service.recompute(
            RefreshTopic::TransactionAdded.into(),
            &profile(),
            jan(),
            day(28),
        );

        let shopping = &dashboard.aggregate.categories[0];
        let budget = shopping.budget.unwrap();
        assert_eq!(budget.progress, 96.0);
        assert_eq!(dashboard.insights.tip.rule, BUDGET_ALERT);
        assert_eq!(dashboard.remaining_budget(), Money::from_minor(38_000));
    }

    #[test]
    fn test_prior_month_feeds_delta_and_projection() {
        let source = FixedSource(vec![
            txn(10_000, "transport", 2024, 12, 10),
            txn(5_000, "transport", 2025, 1, 10),
        ]);
        let taxonomy = CategoryTaxonomy::default();
        let settings = EngineSettings::default();
        let service = DashboardService::new(&source, &taxonomy, &settings);

        let dashboard = service.recompute(RecomputeTrigger::Focus, &profile(), jan(), day(10));
        assert_eq!(dashboard.aggregate.comparison_delta, Some(-50));
        assert_eq!(dashboard.projected_month_end, Money::from_minor(15_500));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let source = FixedSource(vec![
            txn(4_000, "groceries", 2025, 1, 2),
            txn(2_500, "restaurant", 2025, 1, 4),
            txn(900, "subscriptions", 2025, 1, 5),
        ]);
        let taxonomy = CategoryTaxonomy::default();
        let settings = EngineSettings::default();
        let service = DashboardService::new(&source, &taxonomy, &settings);

        let first = service.recompute(RecomputeTrigger::InitialLoad, &profile(), jan(), day(6));
        let second = service.recompute(RecomputeTrigger::InitialLoad, &profile(), jan(), day(6));
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_generator_is_used() {
        let source = FixedSource(vec![txn(1_000, "food", 2025, 1, 2)]);
        let taxonomy = CategoryTaxonomy::default();
        let settings = EngineSettings::default();
        let generator = InsightGenerator::default().with_tip_rule(InsightRule {
            id: "payday",
            glyph: "💰",
            applies: |_| true,
            render: |_| Rendered::plain("Payday is Friday"),
        });
        let service =
            DashboardService::new(&source, &taxonomy, &settings).with_generator(generator);

        let dashboard = service.recompute(RecomputeTrigger::Refresh, &profile(), jan(), day(2));
        assert_eq!(dashboard.insights.tip.rule, "payday");
        assert_eq!(dashboard.insights.tip.message, "Payday is Friday");
    }
}
