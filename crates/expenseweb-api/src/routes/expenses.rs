//! Expense CRUD endpoints - JSON responses
//!
//! Endpoints:
//! - api_expenses_list: paginated, filterable expense list
//! - api_expense_create: validated create
//! - api_expense_update: owner-checked update
//! - api_expense_delete: owner-checked delete

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime};
use expenseweb_core::{local_now, Category, Expense, ExpenseFilter, ExpenseId, NewExpense};
use serde::Serialize;
use std::collections::HashMap;

use crate::auth::Owner;
use crate::error::ApiError;
use crate::AppState;

/// Expense list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total: usize,
}

/// Create/update confirmation
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub message: String,
    pub expense: Expense,
}

/// Parse a date parameter as a full datetime or a plain date
fn parse_date_param(raw: &str, field: &str) -> Result<NaiveDateTime, ApiError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap())
        .map_err(|_| ApiError::validation(field, "Valid date is required"))
}

/// List expenses with pagination and filters (JSON API)
pub async fn api_expenses_list(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ExpenseListResponse>, ApiError> {
    let page = params
        .get("page")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1usize)
        .max(1);
    let per_page = params
        .get("limit")
        .and_then(|s| s.parse().ok())
        .unwrap_or(state.config.pagination.records_per_page)
        .max(1);

    let mut filter = ExpenseFilter::default();
    if let Some(raw) = params.get("category") {
        if raw != "all" {
            let category: Category = raw
                .parse()
                .map_err(|_| ApiError::validation("category", "Unknown category"))?;
            filter.category = Some(category);
        }
    }
    if let Some(raw) = params.get("startDate") {
        filter.start_date = Some(parse_date_param(raw, "startDate")?);
    }
    if let Some(raw) = params.get("endDate") {
        filter.end_date = Some(parse_date_param(raw, "endDate")?);
    }

    let result = state.expenses.list(&owner, &filter, page, per_page).await?;
    let total_pages = result.total.div_ceil(per_page);

    Ok(Json(ExpenseListResponse {
        expenses: result.expenses,
        total_pages,
        current_page: page,
        total: result.total,
    }))
}

/// Create a new expense (JSON API)
pub async fn api_expense_create(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(body): Json<NewExpense>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ApiError> {
    body.validate()?;
    let expense = body.into_expense(owner, local_now());
    let stored = state.expenses.insert(expense).await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse {
            message: "Expense added successfully".to_string(),
            expense: stored,
        }),
    ))
}

/// Update an owned expense (JSON API)
pub async fn api_expense_update(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(body): Json<NewExpense>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    body.validate()?;
    let updated = state
        .expenses
        .update(&owner, &ExpenseId(id), body)
        .await?;

    Ok(Json(ExpenseResponse {
        message: "Expense updated successfully".to_string(),
        expense: updated,
    }))
}

/// Delete an owned expense (JSON API)
pub async fn api_expense_delete(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.expenses.delete(&owner, &ExpenseId(id)).await?;
    Ok(Json(
        serde_json::json!({ "message": "Expense deleted successfully" }),
    ))
}
