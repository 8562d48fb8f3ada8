//! Storage seams for expenses and users
//!
//! The ledger and the user store are external collaborators as far as
//! the analytics code is concerned; they are modeled as async traits
//! so the engine only depends on the query capability, not on a
//! concrete backend. The in-memory implementations back the server and
//! the tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::time::DateWindow;
use crate::types::{Category, Expense, ExpenseId, NewExpense, OwnerId, User};

/// Filter for expense listing
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Restrict to one category
    pub category: Option<Category>,
    /// Inclusive lower date bound
    pub start_date: Option<chrono::NaiveDateTime>,
    /// Inclusive upper date bound
    pub end_date: Option<chrono::NaiveDateTime>,
}

impl ExpenseFilter {
    fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = self.category {
            if expense.category != category {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if expense.date > end {
                return false;
            }
        }
        true
    }
}

/// One page of an owner's expense list
#[derive(Debug, Clone)]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    /// Total matching records across all pages
    pub total: usize,
}

/// Query capability over the expense ledger
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Persist a new expense
    async fn insert(&self, expense: Expense) -> CoreResult<Expense>;

    /// Fetch one expense; owner mismatch reads as not-found
    async fn get(&self, owner: &OwnerId, id: &ExpenseId) -> CoreResult<Expense>;

    /// Replace the mutable fields of an owned expense
    async fn update(
        &self,
        owner: &OwnerId,
        id: &ExpenseId,
        changes: NewExpense,
    ) -> CoreResult<Expense>;

    /// Delete an owned expense
    async fn delete(&self, owner: &OwnerId, id: &ExpenseId) -> CoreResult<()>;

    /// List expenses date-descending with pagination (1-based page)
    async fn list(
        &self,
        owner: &OwnerId,
        filter: &ExpenseFilter,
        page: usize,
        per_page: usize,
    ) -> CoreResult<ExpensePage>;

    /// All expenses with `date` inside the window
    async fn in_window(&self, owner: &OwnerId, window: &DateWindow) -> CoreResult<Vec<Expense>>;

    /// Top-N most recent expenses by date descending
    async fn recent(&self, owner: &OwnerId, limit: usize) -> CoreResult<Vec<Expense>>;
}

/// Read/write capability over user budget settings
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Configured monthly budget for an owner (0 when unset)
    async fn monthly_budget(&self, owner: &OwnerId) -> CoreResult<f64>;

    /// Persist a new monthly budget value, returning the stored value
    async fn set_monthly_budget(&self, owner: &OwnerId, value: f64) -> CoreResult<f64>;

    /// Insert or replace a user record
    async fn upsert(&self, user: User) -> CoreResult<()>;
}

// ==================== In-memory implementations ====================

/// In-memory expense ledger keyed by owner
#[derive(Default)]
pub struct MemoryExpenseStore {
    inner: RwLock<HashMap<OwnerId, Vec<Expense>>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort date-descending; insertion order breaks ties, which keeps the
/// ordering stable across recomputations
fn sort_by_date_desc(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn insert(&self, expense: Expense) -> CoreResult<Expense> {
        let mut data = self.inner.write().await;
        data.entry(expense.owner.clone())
            .or_default()
            .push(expense.clone());
        Ok(expense)
    }

    async fn get(&self, owner: &OwnerId, id: &ExpenseId) -> CoreResult<Expense> {
        let data = self.inner.read().await;
        data.get(owner)
            .and_then(|rows| rows.iter().find(|e| &e.id == id))
            .cloned()
            .ok_or_else(|| CoreError::ExpenseNotFound { id: id.to_string() })
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &ExpenseId,
        changes: NewExpense,
    ) -> CoreResult<Expense> {
        let mut data = self.inner.write().await;
        let rows = data
            .get_mut(owner)
            .ok_or_else(|| CoreError::ExpenseNotFound { id: id.to_string() })?;
        let expense = rows
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| CoreError::ExpenseNotFound { id: id.to_string() })?;

        expense.amount = changes.amount;
        expense.category = changes.category;
        expense.description = changes.description.map(|d| d.trim().to_string());
        expense.date = changes.date;
        Ok(expense.clone())
    }

    async fn delete(&self, owner: &OwnerId, id: &ExpenseId) -> CoreResult<()> {
        let mut data = self.inner.write().await;
        let rows = data
            .get_mut(owner)
            .ok_or_else(|| CoreError::ExpenseNotFound { id: id.to_string() })?;
        let before = rows.len();
        rows.retain(|e| &e.id != id);
        if rows.len() == before {
            return Err(CoreError::ExpenseNotFound { id: id.to_string() });
        }
        Ok(())
    }

    async fn list(
        &self,
        owner: &OwnerId,
        filter: &ExpenseFilter,
        page: usize,
        per_page: usize,
    ) -> CoreResult<ExpensePage> {
        let data = self.inner.read().await;
        let mut matching: Vec<Expense> = data
            .get(owner)
            .map(|rows| rows.iter().filter(|e| filter.matches(e)).cloned().collect())
            .unwrap_or_default();
        sort_by_date_desc(&mut matching);

        let total = matching.len();
        // Saturating: an absurd page number reads as an empty page
        let skip = page.max(1).saturating_sub(1).saturating_mul(per_page);
        let expenses = matching.into_iter().skip(skip).take(per_page).collect();
        Ok(ExpensePage { expenses, total })
    }

    async fn in_window(&self, owner: &OwnerId, window: &DateWindow) -> CoreResult<Vec<Expense>> {
        let data = self.inner.read().await;
        Ok(data
            .get(owner)
            .map(|rows| {
                rows.iter()
                    .filter(|e| window.contains(&e.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn recent(&self, owner: &OwnerId, limit: usize) -> CoreResult<Vec<Expense>> {
        let data = self.inner.read().await;
        let mut rows: Vec<Expense> = data.get(owner).cloned().unwrap_or_default();
        sort_by_date_desc(&mut rows);
        rows.truncate(limit);
        Ok(rows)
    }
}

/// In-memory user store
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<HashMap<OwnerId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn monthly_budget(&self, owner: &OwnerId) -> CoreResult<f64> {
        let data = self.inner.read().await;
        // Unknown owners read as "no budget set"
        Ok(data.get(owner).map(|u| u.monthly_budget).unwrap_or(0.0))
    }

    async fn set_monthly_budget(&self, owner: &OwnerId, value: f64) -> CoreResult<f64> {
        let mut data = self.inner.write().await;
        let user = data.entry(owner.clone()).or_insert_with(|| User {
            id: owner.clone(),
            monthly_budget: 0.0,
        });
        user.monthly_budget = value;
        Ok(user.monthly_budget)
    }

    async fn upsert(&self, user: User) -> CoreResult<()> {
        let mut data = self.inner.write().await;
        data.insert(user.id.clone(), user);
        Ok(())
    }
}

// ==================== Seed loading ====================

/// Startup seed data for the in-memory stores
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl SeedData {
    /// Read seed data from a JSON file
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::StoreError {
            message: format!("failed to read seed file: {}", e),
        })?;
        serde_json::from_str(&content).map_err(|e| CoreError::StoreError {
            message: format!("invalid seed file: {}", e),
        })
    }

    /// Load the seed into the given stores
    pub async fn apply(
        self,
        expenses: &dyn ExpenseStore,
        users: &dyn UserStore,
    ) -> CoreResult<()> {
        let (user_count, expense_count) = (self.users.len(), self.expenses.len());
        for user in self.users {
            users.upsert(user).await?;
        }
        for expense in self.expenses {
            expenses.insert(expense).await?;
        }
        log::info!(
            "Seed loaded: {} users, {} expenses",
            user_count,
            expense_count
        );
        Ok(())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn expense(owner: &str, amount: f64, category: Category, date: chrono::NaiveDateTime) -> Expense {
        Expense {
            id: ExpenseId::generate(),
            owner: OwnerId::new(owner),
            amount,
            category,
            description: None,
            date,
            created_at: dt(2026, 8, 1),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryExpenseStore::new();
        let e = expense("alice", 10.0, Category::Shopping, dt(2026, 8, 10));
        let id = e.id.clone();
        store.insert(e).await.unwrap();

        let fetched = store.get(&OwnerId::new("alice"), &id).await.unwrap();
        assert_eq!(fetched.amount, 10.0);
    }

    #[tokio::test]
    async fn test_owner_isolation() {
        let store = MemoryExpenseStore::new();
        let e = expense("alice", 10.0, Category::Shopping, dt(2026, 8, 10));
        let id = e.id.clone();
        store.insert(e).await.unwrap();

        // Bob cannot see, update, or delete Alice's expense
        let err = store.get(&OwnerId::new("bob"), &id).await.unwrap_err();
        assert!(matches!(err, CoreError::ExpenseNotFound { .. }));
        assert!(store.delete(&OwnerId::new("bob"), &id).await.is_err());

        // Alice still owns it
        assert!(store.get(&OwnerId::new("alice"), &id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let store = MemoryExpenseStore::new();
        let e = expense("alice", 10.0, Category::Shopping, dt(2026, 8, 10));
        let id = e.id.clone();
        store.insert(e).await.unwrap();

        let updated = store
            .update(
                &OwnerId::new("alice"),
                &id,
                NewExpense {
                    amount: 25.5,
                    category: Category::Travel,
                    description: Some("  train ticket  ".to_string()),
                    date: dt(2026, 8, 11),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, 25.5);
        assert_eq!(updated.category, Category::Travel);
        assert_eq!(updated.description.as_deref(), Some("train ticket"));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryExpenseStore::new();
        let e = expense("alice", 10.0, Category::Shopping, dt(2026, 8, 10));
        let id = e.id.clone();
        store.insert(e).await.unwrap();

        store.delete(&OwnerId::new("alice"), &id).await.unwrap();
        assert!(store.get(&OwnerId::new("alice"), &id).await.is_err());
        // Second delete is not-found
        assert!(store.delete(&OwnerId::new("alice"), &id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_pagination_and_order() {
        let store = MemoryExpenseStore::new();
        let owner = OwnerId::new("alice");
        for day in 1..=25 {
            store
                .insert(expense("alice", day as f64, Category::Other, dt(2026, 8, day)))
                .await
                .unwrap();
        }

        let page1 = store
            .list(&owner, &ExpenseFilter::default(), 1, 10)
            .await
            .unwrap();
        assert_eq!(page1.total, 25);
        assert_eq!(page1.expenses.len(), 10);
        // Date-descending: newest first
        assert_eq!(page1.expenses[0].date, dt(2026, 8, 25));

        let page3 = store
            .list(&owner, &ExpenseFilter::default(), 3, 10)
            .await
            .unwrap();
        assert_eq!(page3.expenses.len(), 5);
        assert_eq!(page3.expenses.last().unwrap().date, dt(2026, 8, 1));
    }

    #[tokio::test]
    async fn test_list_out_of_range_page_is_empty() {
        let store = MemoryExpenseStore::new();
        let owner = OwnerId::new("alice");
        store
            .insert(expense("alice", 5.0, Category::Other, dt(2026, 8, 5)))
            .await
            .unwrap();

        for page in [2, 1_000_000, usize::MAX] {
            let result = store
                .list(&owner, &ExpenseFilter::default(), page, 10)
                .await
                .unwrap();
            assert!(result.expenses.is_empty());
            assert_eq!(result.total, 1);
        }
    }

    #[tokio::test]
    async fn test_list_category_and_date_filter() {
        let store = MemoryExpenseStore::new();
        let owner = OwnerId::new("alice");
        store
            .insert(expense("alice", 5.0, Category::FoodAndDining, dt(2026, 8, 5)))
            .await
            .unwrap();
        store
            .insert(expense("alice", 7.0, Category::Travel, dt(2026, 8, 6)))
            .await
            .unwrap();
        store
            .insert(expense("alice", 9.0, Category::FoodAndDining, dt(2026, 7, 5)))
            .await
            .unwrap();

        let filter = ExpenseFilter {
            category: Some(Category::FoodAndDining),
            start_date: Some(dt(2026, 8, 1)),
            end_date: None,
        };
        let page = store.list(&owner, &filter, 1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.expenses[0].amount, 5.0);
    }

    #[tokio::test]
    async fn test_recent_returns_top_n_by_date() {
        let store = MemoryExpenseStore::new();
        let owner = OwnerId::new("alice");
        for day in 1..=8 {
            store
                .insert(expense("alice", day as f64, Category::Other, dt(2026, 8, day)))
                .await
                .unwrap();
        }

        let recent = store.recent(&owner, 5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].date, dt(2026, 8, 8));
        assert_eq!(recent[4].date, dt(2026, 8, 4));
    }

    #[tokio::test]
    async fn test_in_window_filters_by_date() {
        let store = MemoryExpenseStore::new();
        let owner = OwnerId::new("alice");
        store
            .insert(expense("alice", 5.0, Category::Other, dt(2026, 8, 5)))
            .await
            .unwrap();
        store
            .insert(expense("alice", 7.0, Category::Other, dt(2026, 6, 5)))
            .await
            .unwrap();

        let window = DateWindow {
            start: Some(dt(2026, 8, 1)),
            end: dt(2026, 8, 31),
        };
        let rows = store.in_window(&owner, &window).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 5.0);
    }

    #[tokio::test]
    async fn test_user_store_budget_round_trip() {
        let store = MemoryUserStore::new();
        let owner = OwnerId::new("alice");

        // Unknown owner reads as unset budget
        assert_eq!(store.monthly_budget(&owner).await.unwrap(), 0.0);

        let stored = store.set_monthly_budget(&owner, 250.5).await.unwrap();
        assert_eq!(stored, 250.5);
        assert_eq!(store.monthly_budget(&owner).await.unwrap(), 250.5);
    }
}
