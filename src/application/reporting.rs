use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, CategoryId, Cents, Transaction, TransactionType};

/// Number of transactions shown in the "recent" list of a summary.
pub const RECENT_TRANSACTIONS: usize = 5;

/// Dashboard data for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_income: Cents,
    pub total_expense: Cents,
    /// Income minus expense for the month
    pub net: Cents,
    /// Most recent transactions overall, not limited to the month
    pub recent: Vec<Transaction>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub total: Cents,
    pub count: i64,
}

/// First and last day of a calendar month, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

/// Build a summary from the month's transactions, the overall most recent
/// ones and the category table.
pub fn summarize_month(
    start: NaiveDate,
    end: NaiveDate,
    in_month: &[Transaction],
    recent: Vec<Transaction>,
    categories: &[Category],
) -> MonthlySummary {
    let total_of = |kind: TransactionType| -> Cents {
        in_month
            .iter()
            .filter(|tx| tx.transaction_type == kind)
            .map(|tx| tx.amount_cents)
            .sum()
    };
    let total_income = total_of(TransactionType::Income);
    let total_expense = total_of(TransactionType::Expense);

    MonthlySummary {
        year: start.year(),
        month: start.month(),
        period_start: start,
        period_end: end,
        total_income,
        total_expense,
        net: total_income - total_expense,
        recent,
        expense_by_category: totals_by_category(in_month, categories, TransactionType::Expense),
        income_by_category: totals_by_category(in_month, categories, TransactionType::Income),
    }
}

/// Per-category totals for one transaction type, largest first.
pub fn totals_by_category(
    transactions: &[Transaction],
    categories: &[Category],
    kind: TransactionType,
) -> Vec<CategoryTotal> {
    let mut sums: HashMap<CategoryId, (Cents, i64)> = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.transaction_type == kind) {
        let entry = sums.entry(tx.category_id).or_insert((0, 0));
        entry.0 += tx.amount_cents;
        entry.1 += 1;
    }

    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .filter_map(|(category_id, (total, count))| {
            // unknown categories are skipped
            let category = categories.iter().find(|c| c.id == category_id)?;
            Some(CategoryTotal {
                category_id,
                name: category.name.clone(),
                icon: category.icon.clone(),
                color: category.color.clone(),
                total,
                count,
            })
        })
        .collect();

    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    totals
}
