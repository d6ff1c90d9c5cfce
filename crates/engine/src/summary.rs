//! Spending summaries shown next to a settlement.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{Expense, Money};

/// Label used for expenses without a category.
pub const UNCATEGORIZED: &str = "Other";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Display name as first seen.
    pub name: String,
    pub amount: Money,
    pub expenses: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: Money,
}

/// Grouping key for category names: accents, case and punctuation are
/// ignored, so "Café", "cafe" and "CAFE!" land together.
fn category_key(input: &str) -> Option<String> {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in input.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Amount spent per category, largest first; ties keep first appearance.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut position: HashMap<Option<String>, usize> = HashMap::new();

    for expense in expenses {
        let key = expense.category.as_deref().and_then(category_key);
        let at = *position.entry(key.clone()).or_insert_with(|| {
            let name = match (&key, expense.category.as_deref()) {
                (Some(_), Some(name)) => name.trim().to_string(),
                _ => UNCATEGORIZED.to_string(),
            };
            totals.push(CategoryTotal {
                name,
                amount: Money::ZERO,
                expenses: 0,
            });
            totals.len() - 1
        });
        totals[at].amount = totals[at].amount.saturating_add(expense.amount);
        totals[at].expenses += 1;
    }

    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

/// Amount spent per expense date, ascending.
pub fn daily_totals(expenses: &[Expense]) -> Vec<DailyTotal> {
    let mut by_date: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for expense in expenses {
        let amount = by_date.entry(expense.date).or_default();
        *amount = amount.saturating_add(expense.amount);
    }
    by_date
        .into_iter()
        .map(|(date, amount)| DailyTotal { date, amount })
        .collect()
}

/// Expenses recorded on `date`, in input order.
pub fn expenses_on(expenses: &[Expense], date: NaiveDate) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|expense| expense.date == date)
        .cloned()
        .collect()
}

pub fn trip_total(expenses: &[Expense]) -> Money {
    expenses.iter().map(|expense| expense.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Currency, Split};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn expense(amount: i64, date: NaiveDate, category: Option<&str>) -> Expense {
        let expense = Expense::new(
            "item",
            Money::new(amount),
            "a",
            Split::equal(["a"]),
            Currency::Krw,
            date,
        );
        match category {
            Some(category) => expense.with_category(category),
            None => expense,
        }
    }

    #[test]
    fn category_names_are_grouped_loosely() {
        let expenses = vec![
            expense(100, day(1), Some("Café")),
            expense(300, day(1), Some("Lodging")),
            expense(50, day(2), Some(" cafe ")),
            expense(20, day(2), None),
            expense(30, day(2), Some("!!")),
        ];
        let totals = category_totals(&expenses);
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    name: "Lodging".into(),
                    amount: Money::new(300),
                    expenses: 1,
                },
                CategoryTotal {
                    name: "Café".into(),
                    amount: Money::new(150),
                    expenses: 2,
                },
                CategoryTotal {
                    name: UNCATEGORIZED.into(),
                    amount: Money::new(50),
                    expenses: 2,
                },
            ]
        );
    }

    #[test]
    fn daily_totals_are_sorted_by_date() {
        let expenses = vec![
            expense(10, day(3), None),
            expense(20, day(1), None),
            expense(5, day(3), None),
        ];
        assert_eq!(
            daily_totals(&expenses),
            vec![
                DailyTotal {
                    date: day(1),
                    amount: Money::new(20),
                },
                DailyTotal {
                    date: day(3),
                    amount: Money::new(15),
                },
            ]
        );
    }

    #[test]
    fn filter_by_date_and_total() {
        let expenses = vec![
            expense(10, day(3), None),
            expense(20, day(1), None),
            expense(5, day(3), None),
        ];
        let on_third = expenses_on(&expenses, day(3));
        assert_eq!(on_third.len(), 2);
        assert_eq!(trip_total(&on_third), Money::new(15));
        assert_eq!(trip_total(&expenses), Money::new(35));
        assert!(expenses_on(&expenses, day(2)).is_empty());
    }
}
