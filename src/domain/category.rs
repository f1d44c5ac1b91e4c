//! Domain types representing transaction categories.

use serde::{Deserialize, Serialize};

use crate::domain::common::{new_id, EntryKind};

/// Reserved category receiving a positive balance carried from the previous month.
pub const TRANSFER_IN: &str = "transfer-in";
/// Reserved category receiving a negative balance carried from the previous month.
pub const TRANSFER_OUT: &str = "transfer-out";

pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown category";
pub const UNKNOWN_CATEGORY_COLOR: &str = "#9ca3af";

/// Classifies transactions for summaries and charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub system: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            color: color.into(),
            kind,
            system: false,
        }
    }

    fn builtin(id: &str, name: &str, color: &str, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            kind,
            system: false,
        }
    }

    fn reserved(id: &str, name: &str, color: &str, kind: EntryKind) -> Self {
        Self {
            system: true,
            ..Self::builtin(id, name, color, kind)
        }
    }

    /// Returns `true` when the category holds carried-over balances.
    pub fn is_transfer(&self) -> bool {
        is_transfer_id(&self.id)
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: CategoryUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
    }
}

/// Field mask for category edits. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub kind: Option<EntryKind>,
}

impl CategoryUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.kind.is_none()
    }
}

/// Name and color used to render a category reference, resolved even when the
/// category no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabel {
    pub name: String,
    pub color: String,
    pub found: bool,
}

impl CategoryLabel {
    pub fn of(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            color: category.color.clone(),
            found: true,
        }
    }

    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_CATEGORY_NAME.into(),
            color: UNKNOWN_CATEGORY_COLOR.into(),
            found: false,
        }
    }
}

pub fn is_transfer_id(id: &str) -> bool {
    id == TRANSFER_IN || id == TRANSFER_OUT
}

/// Built-in categories that must always be present.
pub fn system_categories() -> Vec<Category> {
    vec![
        Category::reserved(TRANSFER_IN, "Previous balance", "#0ea5e9", EntryKind::Income),
        Category::reserved(TRANSFER_OUT, "Previous deficit", "#f43f5e", EntryKind::Expense),
    ]
}

/// Category set seeded for a fresh ledger.
pub fn default_categories() -> Vec<Category> {
    use EntryKind::{Expense, Income};

    let mut categories = vec![
        Category::builtin("salary", "Salary", "#22c55e", Income),
        Category::builtin("freelance", "Freelance", "#10b981", Income),
        Category::builtin("investments", "Investments", "#14b8a6", Income),
        Category::builtin("other-income", "Other income", "#84cc16", Income),
        Category::builtin("housing", "Housing", "#ef4444", Expense),
        Category::builtin("food", "Food", "#f97316", Expense),
        Category::builtin("transport", "Transport", "#eab308", Expense),
        Category::builtin("health", "Health", "#ec4899", Expense),
        Category::builtin("education", "Education", "#8b5cf6", Expense),
        Category::builtin("leisure", "Leisure", "#06b6d4", Expense),
        Category::builtin("other-expense", "Other expenses", "#64748b", Expense),
    ];
    categories.extend(system_categories());
    categories
}
