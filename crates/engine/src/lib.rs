//! Expense ledger and reporting engine.
//!
//! - [`Ledger`] persists [`Expense`]s in the `expenses` table.
//! - [`reports`] turns a snapshot of expenses into totals, series and
//!   budget progress.
//! - [`PreferenceStore`] keeps the monthly budget and the other scalar
//!   settings outside the relational store.

pub use category::Category;
pub use error::EngineError;
pub use expenses::{DATE_FORMAT, Expense, ExpenseDraft, decode_date, encode_date};
pub use ledger::{Ledger, LedgerBuilder};
pub use preferences::{PreferenceStore, Preferences, ThemeMode};
pub use reports::{BudgetProgress, CategoryTotals, Summary};

mod category;
mod error;
mod expenses;
mod ledger;
mod preferences;
pub mod reports;
pub mod validate;

pub type ResultEngine<T> = Result<T, EngineError>;
