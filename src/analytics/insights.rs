//! Headline insight and actionable tip selection
//!
//! Both selectors walk an ordered rule table and emit the first rule whose
//! condition holds. Rules are plain data (`InsightRule`), so new ones can be
//! placed ahead of the defaults without touching the selection loop.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::aggregator::{CategoryAggregate, MonthlyAggregate};
use super::budget_status::BudgetStatus;
use crate::config::EngineSettings;
use crate::models::{Money, Month};

/// How far through its month a reporting period is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayProgress {
    pub day_of_month: u32,
    pub days_in_month: u32,
}

impl DayProgress {
    pub fn new(day_of_month: u32, days_in_month: u32) -> Self {
        Self {
            day_of_month: day_of_month.min(days_in_month),
            days_in_month,
        }
    }

    /// Progress of `month` as seen on `today`
    ///
    /// Past months are complete; future months have not started.
    pub fn for_month(month: Month, today: NaiveDate) -> Self {
        let days = month.days();
        if month.contains_date(today) {
            Self::new(chrono::Datelike::day(&today), days)
        } else if today >= month.end_date() {
            Self::new(days, days)
        } else {
            Self::new(0, days)
        }
    }

    /// Share of the month elapsed, as a percentage
    pub fn expected_percent(&self) -> f64 {
        if self.days_in_month == 0 {
            return 0.0;
        }
        self.day_of_month as f64 / self.days_in_month as f64 * 100.0
    }

    /// Days left after today
    pub fn days_remaining(&self) -> u32 {
        self.days_in_month.saturating_sub(self.day_of_month)
    }
}

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub aggregate: &'a MonthlyAggregate,
    pub delta: Option<i64>,
    pub day: DayProgress,
    pub monthly_budget: Money,
    pub over_pace_factor: f64,
    pub improvement_threshold_percent: i64,
}

impl<'a> InsightContext<'a> {
    pub fn new(
        aggregate: &'a MonthlyAggregate,
        day: DayProgress,
        monthly_budget: Money,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            aggregate,
            delta: aggregate.comparison_delta,
            day,
            monthly_budget,
            over_pace_factor: settings.over_pace_factor,
            improvement_threshold_percent: settings.improvement_threshold_percent,
        }
    }

    /// Total spend as a percentage of the monthly budget (0 without a budget)
    pub fn percent_spent(&self) -> f64 {
        if !self.monthly_budget.is_positive() {
            return 0.0;
        }
        self.aggregate.total_spent.as_f64() * 100.0 / self.monthly_budget.as_f64()
    }

    pub fn top_category(&self) -> Option<&'a CategoryAggregate> {
        self.aggregate.top_category()
    }

    pub fn top_status(&self) -> Option<BudgetStatus> {
        self.top_category().and_then(|c| c.status())
    }

    /// Budget left for the month (may be negative)
    pub fn remaining_budget(&self) -> Money {
        self.monthly_budget - self.aggregate.total_spent
    }

    /// First category, in sorted order, that is over or near its limit
    pub fn first_alerting_category(&self) -> Option<&'a CategoryAggregate> {
        self.aggregate
            .categories
            .iter()
            .find(|c| c.status().is_some_and(|s| s.needs_attention()))
    }
}

/// A rendered message with an optional value for the UI to emphasize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub message: String,
    pub highlight: Option<String>,
}

impl Rendered {
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            highlight: None,
        }
    }

    pub fn highlighted(message: impl Into<String>, highlight: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            highlight: Some(highlight.into()),
        }
    }
}

/// One entry of a rule table
#[derive(Debug, Clone, Copy)]
pub struct InsightRule {
    pub id: &'static str,
    pub glyph: &'static str,
    pub applies: fn(&InsightContext) -> bool,
    pub render: fn(&InsightContext) -> Rendered,
}

/// Rule evaluated by the headline selector
pub type HeadlineRule = InsightRule;
/// Rule evaluated by the tip selector
pub type TipRule = InsightRule;

impl InsightRule {
    fn emit(&self, ctx: &InsightContext) -> Insight {
        let Rendered { message, highlight } = (self.render)(ctx);
        Insight {
            rule: self.id,
            glyph: self.glyph,
            message,
            highlight,
        }
    }
}

/// A selected insight or tip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    /// Id of the rule that produced this message
    pub rule: &'static str,
    pub glyph: &'static str,
    pub message: String,
    pub highlight: Option<String>,
}

/// Headline plus tip for one aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightReport {
    pub headline: Insight,
    pub tip: Insight,
}

pub const START_TRACKING: &str = "start-tracking";
pub const OVER_PACE: &str = "over-pace";
pub const SPENDING_DOWN: &str = "spending-down";
pub const CATEGORY_CAUTION: &str = "category-caution";
pub const SUMMARY: &str = "summary";
pub const BUDGET_ALERT: &str = "budget-alert";
pub const DAILY_ALLOWANCE: &str = "daily-allowance";
pub const TRACK_MORE: &str = "track-more";

fn summary_rule() -> InsightRule {
    InsightRule {
        id: SUMMARY,
        glyph: "📊",
        applies: |_| true,
        render: |ctx| {
            let top = ctx
                .top_category()
                .map_or("nothing yet", |c| c.name.as_str());
            let total = ctx.aggregate.total_spent.to_string();
            Rendered::highlighted(
                format!(
                    "{} transactions totalling {} this month. Most of it went to {}.",
                    ctx.aggregate.transaction_count, total, top
                ),
                total,
            )
        },
    }
}

fn track_more_rule() -> InsightRule {
    InsightRule {
        id: TRACK_MORE,
        glyph: "📱",
        applies: |_| true,
        render: |_| Rendered::plain("Log every expense, even small ones, to get sharper insights."),
    }
}

/// The built-in headline rules, in evaluation order
pub fn default_headline_rules() -> Vec<HeadlineRule> {
    vec![
        InsightRule {
            id: START_TRACKING,
            glyph: "📝",
            applies: |ctx| ctx.aggregate.is_empty(),
            render: |_| {
                Rendered::plain("Start tracking your expenses to see where your money goes.")
            },
        },
        InsightRule {
            id: OVER_PACE,
            glyph: "⚠️",
            applies: |ctx| {
                ctx.percent_spent() > ctx.day.expected_percent() * ctx.over_pace_factor
            },
            render: |ctx| {
                let spent = format!("{:.0}%", ctx.percent_spent());
                Rendered::highlighted(
                    format!(
                        "You've used {} of your budget with {:.0}% of the month gone.",
                        spent,
                        ctx.day.expected_percent()
                    ),
                    spent,
                )
            },
        },
        InsightRule {
            id: SPENDING_DOWN,
            glyph: "🎉",
            applies: |ctx| {
                ctx.delta
                    .is_some_and(|d| d < ctx.improvement_threshold_percent)
            },
            render: |ctx| {
                let saved = format!("{}%", ctx.delta.unwrap_or_default().abs());
                Rendered::highlighted(
                    format!("You're spending {} less than last month. Keep it up!", saved),
                    saved,
                )
            },
        },
        InsightRule {
            id: CATEGORY_CAUTION,
            glyph: "👀",
            applies: |ctx| ctx.top_status().is_some_and(|s| s.needs_attention()),
            render: |ctx| match ctx.top_category() {
                Some(top) => {
                    let amount = top.amount.to_string();
                    Rendered::highlighted(
                        format!(
                            "{} has reached {} this month and is close to its limit.",
                            top.name, amount
                        ),
                        amount,
                    )
                }
                None => Rendered::plain("A category is close to its limit."),
            },
        },
        summary_rule(),
    ]
}

/// The built-in tip rules, in evaluation order
pub fn default_tip_rules() -> Vec<TipRule> {
    vec![
        InsightRule {
            id: BUDGET_ALERT,
            glyph: "🚨",
            applies: |ctx| ctx.first_alerting_category().is_some(),
            render: |ctx| match ctx.first_alerting_category() {
                Some(category) => {
                    let (status, ceiling) = category
                        .budget
                        .map(|b| (b.status.label(), b.ceiling.to_string()))
                        .unwrap_or(("Near Limit", String::new()));
                    Rendered::highlighted(
                        format!(
                            "{} is {}: {} spent against a {} limit. Ease off there for the rest of the month.",
                            category.name, status, category.amount, ceiling
                        ),
                        category.name.clone(),
                    )
                }
                None => Rendered::plain("One of your categories needs attention."),
            },
        },
        InsightRule {
            id: DAILY_ALLOWANCE,
            glyph: "💡",
            applies: |ctx| ctx.remaining_budget().is_positive() && ctx.day.days_remaining() > 0,
            render: |ctx| {
                let days = ctx.day.days_remaining();
                let allowance = Money::from_f64_rounded(
                    ctx.remaining_budget().as_f64() / days.max(1) as f64,
                )
                .to_string();
                Rendered::highlighted(
                    format!(
                        "You can spend about {} a day for the remaining {} days.",
                        allowance, days
                    ),
                    allowance,
                )
            },
        },
        track_more_rule(),
    ]
}

/// Selects a headline insight and an actionable tip
#[derive(Debug, Clone)]
pub struct InsightGenerator {
    headline_rules: Vec<HeadlineRule>,
    tip_rules: Vec<TipRule>,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self {
            headline_rules: default_headline_rules(),
            tip_rules: default_tip_rules(),
        }
    }
}

impl InsightGenerator {
    /// Put an extra headline rule ahead of the defaults
    pub fn with_headline_rule(mut self, rule: HeadlineRule) -> Self {
        self.headline_rules.insert(0, rule);
        self
    }

    /// Put an extra tip rule ahead of the defaults
    pub fn with_tip_rule(mut self, rule: TipRule) -> Self {
        self.tip_rules.insert(0, rule);
        self
    }

    pub fn headline(&self, ctx: &InsightContext) -> Insight {
        select(&self.headline_rules, ctx).unwrap_or_else(|| summary_rule().emit(ctx))
    }

    pub fn tip(&self, ctx: &InsightContext) -> Insight {
        select(&self.tip_rules, ctx).unwrap_or_else(|| track_more_rule().emit(ctx))
    }

    pub fn generate(&self, ctx: &InsightContext) -> InsightReport {
        InsightReport {
            headline: self.headline(ctx),
            tip: self.tip(ctx),
        }
    }
}

fn select(rules: &[InsightRule], ctx: &InsightContext) -> Option<Insight> {
    let rule = rules.iter().find(|rule| (rule.applies)(ctx))?;
    debug!(rule = rule.id, "insight rule matched");
    Some(rule.emit(ctx))
}
