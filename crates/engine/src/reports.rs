//! Reporting over a snapshot of expenses.
//!
//! Everything here is a pure function of its arguments: no storage access,
//! no wall clock. Callers fetch a fresh snapshot from the
//! [`Ledger`](crate::Ledger) after every mutation and pass the reference
//! time explicitly.
//!
//! Buckets built from [`sum_in_range`] include both bounds, so a record
//! dated exactly at midnight also counts toward the bucket that ends there.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{Category, Expense};

/// Sum per category. Every [`Category`] is always present.
pub type CategoryTotals = BTreeMap<Category, f64>;

/// Totals map with every category set to `0.0`.
#[must_use]
pub fn empty_totals() -> CategoryTotals {
    Category::ALL.into_iter().map(|c| (c, 0.0)).collect()
}

/// Midnight of the day containing `now`.
#[must_use]
pub fn start_of_day(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

/// Midnight of the Monday starting the ISO week that contains `now`.
#[must_use]
pub fn most_recent_monday(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    let back = Days::new(u64::from(date.weekday().num_days_from_monday()));
    (date - back).and_time(NaiveTime::MIN)
}

/// Midnight of the first day of the month containing `now`.
#[must_use]
pub fn first_of_month(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    (date - Days::new(u64::from(date.day0()))).and_time(NaiveTime::MIN)
}

/// Midnight of the first day of the month after the one containing `now`.
#[must_use]
pub fn first_of_next_month(now: NaiveDateTime) -> NaiveDateTime {
    first_of_month(now)
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Sum of amounts dated within `[start, end]`.
#[must_use]
pub fn sum_in_range(records: &[Expense], start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .map(|r| r.amount)
        .sum()
}

/// Spending of the calendar day containing `now`.
#[must_use]
pub fn total_today(records: &[Expense], now: NaiveDateTime) -> f64 {
    let start = start_of_day(now);
    sum_in_range(records, start, start + Days::new(1))
}

/// Spending of the ISO week (Monday first) containing `now`.
#[must_use]
pub fn total_this_week(records: &[Expense], now: NaiveDateTime) -> f64 {
    let start = most_recent_monday(now);
    sum_in_range(records, start, start + Days::new(7))
}

/// Spending of the calendar month containing `now`.
#[must_use]
pub fn total_this_month(records: &[Expense], now: NaiveDateTime) -> f64 {
    sum_in_range(records, first_of_month(now), first_of_next_month(now))
}

/// Per-day spending for the last `days` days, as `(days_ago, total)`.
///
/// Entry `0` is today. Days are matched on the calendar date only, and days
/// without expenses are present with `0.0`.
#[must_use]
pub fn daily_series(records: &[Expense], now: NaiveDateTime, days: u32) -> Vec<(u32, f64)> {
    let today = now.date();
    let mut totals = vec![0.0; days as usize];
    for record in records {
        let ago = today.signed_duration_since(record.date.date()).num_days();
        if let Ok(ago) = usize::try_from(ago)
            && let Some(slot) = totals.get_mut(ago)
        {
            *slot += record.amount;
        }
    }
    (0..days).zip(totals).collect()
}

/// Per-month spending for the last `months` calendar months, as
/// `(months_ago, total)`.
///
/// Entry `0` is the current month. Each bucket is `[first, first of next)`
/// so a record never lands in two adjacent months.
#[must_use]
pub fn monthly_series(records: &[Expense], now: NaiveDateTime, months: u32) -> Vec<(u32, f64)> {
    let current = first_of_month(now);
    (0..months)
        .map(|ago| {
            let start = current
                .checked_sub_months(Months::new(ago))
                .unwrap_or(NaiveDateTime::MIN);
            let end = first_of_next_month(start);
            let total = records
                .iter()
                .filter(|r| r.date >= start && r.date < end)
                .map(|r| r.amount)
                .sum();
            (ago, total)
        })
        .collect()
}

/// Sum of amounts grouped by category.
#[must_use]
pub fn category_breakdown(records: &[Expense]) -> CategoryTotals {
    let mut totals = empty_totals();
    for record in records {
        *totals.entry(record.category).or_default() += record.amount;
    }
    totals
}

/// Fraction of the grand total per category, largest first.
///
/// Ties keep category order. When nothing was spent every share is `0.0`.
#[must_use]
pub fn category_shares(totals: &CategoryTotals) -> Vec<(Category, f64)> {
    let grand_total: f64 = totals.values().sum();
    let mut shares: Vec<(Category, f64)> = totals
        .iter()
        .map(|(category, amount)| {
            let share = if grand_total > 0.0 {
                amount / grand_total
            } else {
                0.0
            };
            (*category, share)
        })
        .collect();
    shares.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    shares
}

/// How much of a budget has been consumed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    /// `budget - spent`, negative once the budget is exceeded. Without a
    /// budget this is the spending itself.
    pub remaining: f64,
    /// `spent / budget`, uncapped. `0.0` when no budget is configured.
    pub fraction_used: f64,
    pub is_over_budget: bool,
}

/// Compares spending against a budget. A budget `<= 0` means "not set" and
/// never reports an overrun.
#[must_use]
pub fn budget_progress(total_spent: f64, budget: f64) -> BudgetProgress {
    let has_budget = budget > 0.0;
    BudgetProgress {
        remaining: if has_budget {
            budget - total_spent
        } else {
            total_spent
        },
        fraction_used: if has_budget { total_spent / budget } else { 0.0 },
        is_over_budget: has_budget && total_spent > budget,
    }
}

/// Days covered by [`Summary::last_seven_days`].
pub const SUMMARY_DAYS: u32 = 7;

/// Everything a dashboard shows, computed from one snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub today: NaiveDate,
    pub total_today: f64,
    pub total_this_week: f64,
    pub total_this_month: f64,
    pub last_seven_days: Vec<(u32, f64)>,
    pub by_category: CategoryTotals,
    /// Progress of the current month against the monthly budget.
    pub budget: BudgetProgress,
}

impl Summary {
    #[must_use]
    pub fn compute(records: &[Expense], budget: f64, now: NaiveDateTime) -> Self {
        let total_this_month = total_this_month(records, now);
        Self {
            today: now.date(),
            total_today: total_today(records, now),
            total_this_week: total_this_week(records, now),
            total_this_month,
            last_seven_days: daily_series(records, now, SUMMARY_DAYS),
            by_category: category_breakdown(records),
            budget: budget_progress(total_this_month, budget),
        }
    }
}
