//! Core expense ledger processing and business logic
//!
//! Modules:
//! - types: domain records (Expense, User, Category) and validation
//! - store: async storage seams plus in-memory implementations
//! - time: date-window arithmetic for all report queries
//! - analytics: category breakdown, monthly trend, dashboard summary
//! - budget: budget status and tiered alerting
//! - error: CoreError with error codes and API-facing details

pub mod analytics;
pub mod budget;
pub mod error;
pub mod store;
pub mod time;
pub mod types;

pub use analytics::{
    AnalyticsEngine, CategoryBreakdownReport, CategorySummary, DashboardSummary,
    MonthlySummary, MonthlyTrendReport, WindowTotal,
};
pub use budget::{AlertLevel, BudgetAlert, BudgetEvaluator, BudgetStatus};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity, Violation};
pub use store::{
    ExpenseFilter, ExpensePage, ExpenseStore, MemoryExpenseStore, MemoryUserStore, SeedData,
    UserStore,
};
pub use time::{BreakdownPeriod, DateWindow};
pub use types::{round2, Category, Expense, ExpenseId, NewExpense, OwnerId, User};

/// Server-local current instant used as the end bound of all windows
pub fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
