//! Analytics API endpoints - JSON responses
//!
//! Endpoints:
//! - api_category_breakdown: spending grouped by category for a period
//! - api_monthly_trend: month-by-month totals over a trailing window
//! - api_dashboard: fixed-window totals plus recent activity

use axum::extract::{Query, State};
use axum::Json;
use expenseweb_core::{
    local_now, BreakdownPeriod, CategoryBreakdownReport, DashboardSummary, MonthlyTrendReport,
};
use std::collections::HashMap;

use crate::auth::Owner;
use crate::error::ApiError;
use crate::AppState;

/// Get category breakdown for a period (JSON API)
///
/// `period` is one of week/month/year; unrecognized values fall back
/// to the configured default window. The response echoes the period
/// exactly as the caller sent it.
pub async fn api_category_breakdown(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<CategoryBreakdownReport>, ApiError> {
    let raw = params.get("period");
    let period = raw
        .map(|p| BreakdownPeriod::parse_lenient(p))
        .unwrap_or_else(|| BreakdownPeriod::parse_lenient(&state.config.analytics.default_period));

    let mut report = state
        .analytics
        .category_breakdown(&owner, period, local_now())
        .await?;
    if let Some(raw) = raw {
        report.period = raw.clone();
    }
    Ok(Json(report))
}

/// Get monthly spending trend (JSON API)
///
/// `months` must parse as a positive integer; the configured default
/// applies when absent.
pub async fn api_monthly_trend(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MonthlyTrendReport>, ApiError> {
    let months = match params.get("months") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ApiError::validation("months", "Months must be a positive number"))?,
        None => state.config.analytics.default_trend_months,
    };

    let report = state
        .analytics
        .monthly_trend(&owner, months, local_now())
        .await?;
    Ok(Json(report))
}

/// Get dashboard summary (JSON API)
pub async fn api_dashboard(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = state.analytics.dashboard_summary(&owner, local_now()).await?;
    Ok(Json(summary))
}
