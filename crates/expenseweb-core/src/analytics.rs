//! Aggregation engine: category breakdown, monthly trend, dashboard
//!
//! All reports are derived values recomputed from the ledger on every
//! call; nothing here is cached or persisted.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::store::ExpenseStore;
use crate::time::{
    all_time_window, month_abbrev, month_to_date_window, today_window, trend_window,
    year_to_date_window, BreakdownPeriod,
};
use crate::types::{round2, Category, Expense, OwnerId};

/// Per-category aggregate for one reporting period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: Category,
    pub amount: f64,
    pub count: usize,
    pub avg_amount: f64,
    pub percentage: f64,
}

/// Category breakdown response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownReport {
    /// Echo of the requested period; handlers may substitute the raw
    /// query value when it differs from the resolved window
    pub period: String,
    pub total_expenses: f64,
    pub categories: Vec<CategorySummary>,
}

/// Aggregate for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Human label, e.g. "Jan 2026"
    pub month: String,
    pub year: i32,
    pub month_num: u32,
    pub amount: f64,
    pub count: usize,
    pub avg_amount: f64,
}

/// Monthly trend response, chronological
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTrendReport {
    pub months: u32,
    pub trends: Vec<MonthlySummary>,
}

/// Sum and count for one dashboard window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowTotal {
    pub amount: f64,
    pub count: usize,
}

impl WindowTotal {
    fn from_expenses(expenses: &[Expense]) -> Self {
        let sum: f64 = expenses.iter().map(|e| e.amount).sum();
        Self {
            amount: round2(sum),
            count: expenses.len(),
        }
    }
}

/// Dashboard summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today: WindowTotal,
    pub this_month: WindowTotal,
    pub this_year: WindowTotal,
    pub total: WindowTotal,
    pub recent_expenses: Vec<Expense>,
}

/// Aggregation engine over one expense store
#[derive(Clone)]
pub struct AnalyticsEngine {
    store: Arc<dyn ExpenseStore>,
    recent_limit: usize,
}

impl AnalyticsEngine {
    pub fn new(store: Arc<dyn ExpenseStore>, recent_limit: usize) -> Self {
        Self {
            store,
            recent_limit,
        }
    }

    /// Group the owner's expenses in the period window by category.
    ///
    /// Groups are ordered by summed amount descending; ties keep their
    /// first-seen order. Percentages are rounded independently per
    /// entry, so they are not guaranteed to sum to exactly 100.
    pub async fn category_breakdown(
        &self,
        owner: &OwnerId,
        period: BreakdownPeriod,
        now: NaiveDateTime,
    ) -> CoreResult<CategoryBreakdownReport> {
        let window = period.window(now);
        let expenses = self.store.in_window(owner, &window).await?;

        // First-seen order preserved for stable tie-breaking
        let mut groups: Vec<(Category, f64, usize)> = Vec::new();
        for expense in &expenses {
            match groups.iter_mut().find(|(c, _, _)| *c == expense.category) {
                Some((_, sum, count)) => {
                    *sum += expense.amount;
                    *count += 1;
                }
                None => groups.push((expense.category, expense.amount, 1)),
            }
        }

        let total: f64 = groups.iter().map(|(_, sum, _)| sum).sum();

        // Stable sort on the raw sums, before any rounding
        groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let categories = groups
            .into_iter()
            .map(|(category, sum, count)| CategorySummary {
                category,
                amount: round2(sum),
                count,
                avg_amount: round2(sum / count as f64),
                percentage: if total > 0.0 {
                    round2(sum / total * 100.0)
                } else {
                    0.0
                },
            })
            .collect();

        Ok(CategoryBreakdownReport {
            period: period.to_string(),
            total_expenses: round2(total),
            categories,
        })
    }

    /// Group the owner's expenses of the last `months` months by
    /// calendar month, ascending by (year, month).
    pub async fn monthly_trend(
        &self,
        owner: &OwnerId,
        months: u32,
        now: NaiveDateTime,
    ) -> CoreResult<MonthlyTrendReport> {
        if months == 0 {
            return Err(CoreError::validation(
                "months",
                "Months must be a positive number",
            ));
        }

        let window = trend_window(now, months);
        let expenses = self.store.in_window(owner, &window).await?;

        // BTreeMap keys give the chronological (year, month) order
        let mut groups: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
        for expense in &expenses {
            let key = (expense.date.year(), expense.date.month());
            let entry = groups.entry(key).or_insert((0.0, 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let trends = groups
            .into_iter()
            .map(|((year, month_num), (sum, count))| MonthlySummary {
                month: format!("{} {}", month_abbrev(month_num), year),
                year,
                month_num,
                amount: round2(sum),
                count,
                avg_amount: round2(sum / count as f64),
            })
            .collect();

        Ok(MonthlyTrendReport { months, trends })
    }

    /// Compute the four fixed-window totals and the recent list.
    ///
    /// The five reads are independent and issued concurrently; any
    /// failure fails the whole summary.
    pub async fn dashboard_summary(
        &self,
        owner: &OwnerId,
        now: NaiveDateTime,
    ) -> CoreResult<DashboardSummary> {
        let today = today_window(now);
        let this_month = month_to_date_window(now);
        let this_year = year_to_date_window(now);
        let all_time = all_time_window(now);

        let (today_rows, month_rows, year_rows, total_rows, mut recent) = tokio::try_join!(
            self.store.in_window(owner, &today),
            self.store.in_window(owner, &this_month),
            self.store.in_window(owner, &this_year),
            self.store.in_window(owner, &all_time),
            self.store.recent(owner, self.recent_limit),
        )?;

        for expense in &mut recent {
            expense.amount = round2(expense.amount);
        }

        Ok(DashboardSummary {
            today: WindowTotal::from_expenses(&today_rows),
            this_month: WindowTotal::from_expenses(&month_rows),
            this_year: WindowTotal::from_expenses(&year_rows),
            total: WindowTotal::from_expenses(&total_rows),
            recent_expenses: recent,
        })
    }
}

// ==================== Tests ====================
