//! Route handler modules
//!
//! - analytics: category breakdown, monthly trend, dashboard summary
//! - budget: budget status and budget updates
//! - expenses: expense CRUD and listing

pub mod analytics;
pub mod budget;
pub mod expenses;
