//! Spending Report
//!
//! Renders a month's dashboard as a category table with budget status,
//! plus the headline insight and tip.

use std::io::Write;

use crate::analytics::{BudgetStatus, Insight};
use crate::error::FiscallyResult;
use crate::models::{CategoryId, Money, Month};
use crate::services::Dashboard;

/// One parent category line of the report
#[derive(Debug, Clone)]
pub struct SpendingByCategory {
    pub category_id: CategoryId,
    pub category_name: String,
    pub amount: Money,
    pub transaction_count: usize,
    /// Share of the month's total spend
    pub percentage: f64,
    /// Progress against the category ceiling, clamped for display
    pub progress: Option<f64>,
    pub status: Option<BudgetStatus>,
    pub subcategories: Vec<(String, Money, usize)>,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub month: Month,
    pub total_spending: Money,
    pub monthly_budget: Money,
    pub projected_month_end: Money,
    pub comparison_delta: Option<i64>,
    pub total_transactions: usize,
    pub categories: Vec<SpendingByCategory>,
    pub headline: Insight,
    pub tip: Insight,
}

fn share(amount: Money, total: Money) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        amount.as_f64() / total.as_f64() * 100.0
    }
}

impl SpendingReport {
    /// Build the report from a computed dashboard
    pub fn generate(dashboard: &Dashboard) -> Self {
        let aggregate = &dashboard.aggregate;

        let categories = aggregate
            .categories
            .iter()
            .map(|c| SpendingByCategory {
                category_id: c.category_id.clone(),
                category_name: c.name.clone(),
                amount: c.amount,
                transaction_count: c.transaction_count,
                percentage: share(c.amount, aggregate.total_spent),
                progress: c.budget.map(|b| b.display_progress()),
                status: c.status(),
                subcategories: c
                    .subcategories
                    .iter()
                    .map(|s| (s.name.clone(), s.amount, s.transaction_count))
                    .collect(),
            })
            .collect();

        Self {
            month: dashboard.month,
            total_spending: aggregate.total_spent,
            monthly_budget: dashboard.monthly_budget,
            projected_month_end: dashboard.projected_month_end,
            comparison_delta: aggregate.comparison_delta,
            total_transactions: aggregate.transaction_count,
            categories,
            headline: dashboard.insights.headline.clone(),
            tip: dashboard.insights.tip.clone(),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Report: {}\n", self.month));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!("Total Spent:      {}\n", self.total_spending));
        output.push_str(&format!("Monthly Budget:   {}\n", self.monthly_budget));
        output.push_str(&format!("Projected Spend:  {}\n", self.projected_month_end));
        match self.comparison_delta {
            Some(delta) => output.push_str(&format!("vs Last Month:    {:+}%\n", delta)),
            None => output.push_str("vs Last Month:    n/a\n"),
        }
        output.push_str(&format!("Transactions:     {}\n\n", self.total_transactions));

        output.push_str(&format!(
            "{:<30} {:>12} {:>6} {:>7} {:>9}  {}\n",
            "Category", "Amount", "Count", "%", "Budget %", "Status"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for category in &self.categories {
            let progress = category
                .progress
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| "-".into());
            let status = category.status.map(|s| s.label()).unwrap_or("-");

            output.push_str(&format!(
                "{:<30} {:>12} {:>6} {:>6.1}% {:>9}  {}\n",
                category.category_name,
                category.amount,
                category.transaction_count,
                category.percentage,
                progress,
                status
            ));

            if category.subcategories.len() > 1 {
                for (name, amount, count) in &category.subcategories {
                    output.push_str(&format!("  {:<28} {:>12} {:>6}\n", name, amount, count));
                }
            }
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12} {:>6}\n\n",
            "TOTAL", self.total_spending, self.total_transactions
        ));

        output.push_str(&format!("{} {}\n", self.headline.glyph, self.headline.message));
        output.push_str(&format!("{} {}\n", self.tip.glyph, self.tip.message));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FiscallyResult<()> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record([
            "Month",
            "Category",
            "Subcategory",
            "Amount",
            "Transaction Count",
            "Percentage",
            "Budget Progress",
            "Status",
        ])?;

        let month = self.month.to_string();
        for category in &self.categories {
            csv.write_record(&[
                month.clone(),
                category.category_name.clone(),
                String::new(),
                category.amount.to_string(),
                category.transaction_count.to_string(),
                format!("{:.2}", category.percentage),
                category
                    .progress
                    .map(|p| format!("{:.2}", p))
                    .unwrap_or_default(),
                category
                    .status
                    .map(|s| s.label().to_string())
                    .unwrap_or_default(),
            ])?;

            for (name, amount, count) in &category.subcategories {
                csv.write_record(&[
                    month.clone(),
                    category.category_name.clone(),
                    name.clone(),
                    amount.to_string(),
                    count.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                ])?;
            }
        }

        csv.write_record(&[
            month,
            "TOTAL".to_string(),
            String::new(),
            self.total_spending.to_string(),
            self.total_transactions.to_string(),
            "100.00".to_string(),
            String::new(),
            String::new(),
        ])?;

        csv.flush()?;
        Ok(())
    }

    /// Get the top spending categories
    pub fn top_categories(&self, limit: usize) -> Vec<&SpendingByCategory> {
        self.categories.iter().take(limit).collect()
    }
}
