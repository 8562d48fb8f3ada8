//! Domain types for the expense ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, Violation};

/// Maximum length of an expense description
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Opaque identifier of an expense owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of an expense record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub String);

impl ExpenseId {
    /// Generate a fresh unique id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expense category enumeration
///
/// Serialized with the human-facing labels so the wire format matches
/// what clients submit in forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 9] = [
        Category::FoodAndDining,
        Category::Transportation,
        Category::Shopping,
        Category::Entertainment,
        Category::BillsAndUtilities,
        Category::Healthcare,
        Category::Education,
        Category::Travel,
        Category::Other,
    ];

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::BillsAndUtilities => "Bills & Utilities",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,
    /// Owning user; immutable after creation
    pub owner: OwnerId,
    /// Positive currency amount
    pub amount: f64,
    /// Expense category
    pub category: Category,
    /// Optional free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the expense occurred (user-settable, may be in the past)
    pub date: NaiveDateTime,
    /// When the record was created
    pub created_at: NaiveDateTime,
}

/// Input payload for creating or replacing an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

impl NewExpense {
    /// Validate the payload, collecting every violated constraint
    pub fn validate(&self) -> CoreResult<()> {
        let mut violations = Vec::new();

        if !self.amount.is_finite() || self.amount <= 0.0 {
            violations.push(Violation::new("amount", "Amount must be greater than 0"));
        }

        if let Some(desc) = &self.description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                violations.push(Violation::new(
                    "description",
                    "Description must be less than 200 characters",
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(CoreError::ValidationError { violations })
        }
    }

    /// Materialize into a stored expense owned by `owner`
    pub fn into_expense(self, owner: OwnerId, created_at: NaiveDateTime) -> Expense {
        Expense {
            id: ExpenseId::generate(),
            owner,
            amount: self.amount,
            category: self.category,
            description: self.description.map(|d| d.trim().to_string()),
            date: self.date,
            created_at,
        }
    }
}

/// A user as seen by the core: identity plus configured budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: OwnerId,
    /// Non-negative; 0 means "no budget set"
    #[serde(default)]
    pub monthly_budget: f64,
}

/// Round a currency value to 2 decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==================== Tests ====================
