//! Plain-text rendering of engine values.

use engine::{BudgetProgress, Category, Expense, encode_date};

const BAR_WIDTH: usize = 20;

pub fn money(amount: f64, symbol: &str) -> String {
    format!("{amount:.2}{symbol}")
}

/// A `#` bar proportional to `value / max`, at most [`BAR_WIDTH`] wide.
pub fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let ratio = (value / max).min(1.0);
    let filled = ((ratio * BAR_WIDTH as f64).round() as usize).max(1);
    "#".repeat(filled)
}

pub fn expense_line(expense: &Expense, symbol: &str) -> String {
    format!(
        "{:>5}  {}  {:<9} {:>12}  {}",
        expense.id,
        expense.date.format("%Y-%m-%d %H:%M"),
        expense.category.label(),
        money(expense.amount, symbol),
        expense.name
    )
}

pub fn expense_detail(expense: &Expense, symbol: &str) -> String {
    format!(
        "id:       {}\nname:     {}\namount:   {}\ndate:     {}\ncategory: {} ({}, {})",
        expense.id,
        expense.name,
        money(expense.amount, symbol),
        encode_date(expense.date),
        expense.category.label(),
        expense.category.icon(),
        expense.category.color()
    )
}

pub fn category_line(category: Category, amount: f64, share: f64, symbol: &str) -> String {
    format!(
        "{:<9} {:>12} {:>6.1}%  {}",
        category.label(),
        money(amount, symbol),
        share * 100.0,
        bar(share, 1.0)
    )
}

pub fn budget_line(spent: f64, budget: Option<f64>, progress: &BudgetProgress, symbol: &str) -> String {
    let Some(budget) = budget else {
        return format!("budget:   not set (spent {} this month)", money(spent, symbol));
    };
    let status = if progress.is_over_budget {
        format!("over by {}", money(-progress.remaining, symbol))
    } else {
        format!("{} left", money(progress.remaining, symbol))
    };
    format!(
        "budget:   {} of {} ({:.0}%), {status}  [{:<width$}]",
        money(spent, symbol),
        money(budget, symbol),
        progress.fraction_used * 100.0,
        bar(progress.fraction_used, 1.0),
        width = BAR_WIDTH
    )
}
