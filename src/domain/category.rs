use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TransactionType;

pub type CategoryId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub category_type: TransactionType,
    pub icon: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn from_draft(draft: CategoryDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            category_type: draft.category_type,
            icon: draft.icon,
            color: draft.color,
            created_at: Utc::now(),
        }
    }

    pub fn apply_draft(&mut self, draft: &CategoryDraft) {
        self.name = draft.name.clone();
        self.category_type = draft.category_type;
        self.icon = draft.icon.clone();
        self.color = draft.color.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub category_type: TransactionType,
    pub icon: String,
    pub color: String,
}

impl CategoryDraft {
    pub fn new(
        name: impl Into<String>,
        category_type: TransactionType,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category_type,
            icon: icon.into(),
            color: color.into(),
        }
    }
}

/// Categories created by `seed_defaults` on an empty store.
pub fn default_categories() -> Vec<CategoryDraft> {
    use TransactionType::{Expense, Income};

    [
        ("Salary", Income, "💼", "#10B981"),
        ("Freelance", Income, "💻", "#3B82F6"),
        ("Investment", Income, "📈", "#8B5CF6"),
        ("Bonus", Income, "🎁", "#F59E0B"),
        ("Other", Income, "💰", "#6366F1"),
        ("Food", Expense, "🍔", "#EF4444"),
        ("Transport", Expense, "🚗", "#F97316"),
        ("Shopping", Expense, "🛒", "#EC4899"),
        ("Bills", Expense, "📄", "#14B8A6"),
        ("Entertainment", Expense, "🎮", "#A855F7"),
        ("Health", Expense, "💊", "#06B6D4"),
        ("Education", Expense, "📚", "#0EA5E9"),
        ("Other", Expense, "📦", "#64748B"),
    ]
    .into_iter()
    .map(|(name, kind, icon, color)| CategoryDraft::new(name, kind, icon, color))
    .collect()
}
