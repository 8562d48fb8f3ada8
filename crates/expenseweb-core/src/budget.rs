//! Budget status and alert derivation
//!
//! Combines the user's configured monthly budget with the current
//! calendar month's spend. The alert policy is a data-driven threshold
//! table evaluated top-down; the first matching tier wins.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::store::{ExpenseStore, UserStore};
use crate::time::calendar_month_window;
use crate::types::{round2, OwnerId};

/// Alert severity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Danger,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Info => write!(f, "info"),
            AlertLevel::Warning => write!(f, "warning"),
            AlertLevel::Danger => write!(f, "danger"),
        }
    }
}

/// A budget alert attached to the status response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub message: String,
}

/// Ordered alert policy: highest threshold first, first match wins.
/// Utilization below the last entry produces no alert.
const ALERT_TIERS: [(f64, AlertLevel, &str); 3] = [
    (
        100.0,
        AlertLevel::Danger,
        "Budget exceeded! You have overspent this month.",
    ),
    (
        80.0,
        AlertLevel::Warning,
        "Warning: You have used 80% of your monthly budget.",
    ),
    (
        60.0,
        AlertLevel::Info,
        "You have used 60% of your monthly budget.",
    ),
];

/// Pick the alert tier for an unrounded utilization percentage
fn alert_for(utilization: f64) -> Option<BudgetAlert> {
    ALERT_TIERS
        .iter()
        .find(|(threshold, _, _)| utilization >= *threshold)
        .map(|(_, level, message)| BudgetAlert {
            level: *level,
            message: message.to_string(),
        })
}

/// Budget status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub monthly_budget: f64,
    pub total_spent: f64,
    /// Negative when overspent
    pub remaining_budget: f64,
    /// Rounded for display; tier selection uses the raw ratio
    pub budget_utilization: f64,
    pub alert: Option<BudgetAlert>,
}

/// Budget evaluation over the expense ledger and user store
#[derive(Clone)]
pub struct BudgetEvaluator {
    expenses: Arc<dyn ExpenseStore>,
    users: Arc<dyn UserStore>,
}

impl BudgetEvaluator {
    pub fn new(expenses: Arc<dyn ExpenseStore>, users: Arc<dyn UserStore>) -> Self {
        Self { expenses, users }
    }

    /// Derive the owner's budget status for the current calendar month
    pub async fn status(&self, owner: &OwnerId, now: NaiveDateTime) -> CoreResult<BudgetStatus> {
        let monthly_budget = self.users.monthly_budget(owner).await?;

        let window = calendar_month_window(now);
        let rows = self.expenses.in_window(owner, &window).await?;
        let total_spent: f64 = rows.iter().map(|e| e.amount).sum();

        let remaining_budget = monthly_budget - total_spent;
        // Zero budget means "not configured": utilization stays 0 and
        // no alert fires no matter the spend
        let utilization = if monthly_budget > 0.0 {
            total_spent / monthly_budget * 100.0
        } else {
            0.0
        };

        Ok(BudgetStatus {
            monthly_budget,
            total_spent,
            remaining_budget,
            budget_utilization: round2(utilization),
            alert: if monthly_budget > 0.0 {
                alert_for(utilization)
            } else {
                None
            },
        })
    }

    /// Validate and persist a new monthly budget, returning the stored value
    pub async fn set_budget(&self, owner: &OwnerId, value: f64) -> CoreResult<f64> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::validation(
                "monthlyBudget",
                "Budget must be a positive number",
            ));
        }
        self.users.set_monthly_budget(owner, value).await
    }
}

// ==================== Tests ====================
