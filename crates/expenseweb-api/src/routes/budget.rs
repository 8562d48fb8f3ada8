//! Budget API endpoints - JSON responses
//!
//! Endpoints:
//! - api_budget_status: current month status with tiered alert
//! - api_budget_update: validate and persist a new monthly budget

use axum::extract::State;
use axum::Json;
use expenseweb_core::{local_now, BudgetStatus};
use serde::{Deserialize, Serialize};

use crate::auth::Owner;
use crate::error::ApiError;
use crate::AppState;

/// Budget update request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdateRequest {
    pub monthly_budget: f64,
}

/// Budget update response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdateResponse {
    pub message: String,
    pub monthly_budget: f64,
}

/// Get current budget status (JSON API)
pub async fn api_budget_status(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<BudgetStatus>, ApiError> {
    let status = state.budget.status(&owner, local_now()).await?;
    Ok(Json(status))
}

/// Update monthly budget (JSON API)
pub async fn api_budget_update(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(body): Json<BudgetUpdateRequest>,
) -> Result<Json<BudgetUpdateResponse>, ApiError> {
    let stored = state.budget.set_budget(&owner, body.monthly_budget).await?;
    Ok(Json(BudgetUpdateResponse {
        message: "Budget updated successfully".to_string(),
        monthly_budget: stored,
    }))
}
