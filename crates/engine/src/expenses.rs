//! Expense records and their `expenses` table mapping.
//!
//! An [`ExpenseDraft`] is what callers hand to the store; an [`Expense`] is
//! what comes back once the store assigned an id.

use chrono::NaiveDateTime;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, ResultEngine, validate};

/// Fixed-width encoding for the `date` column.
///
/// Every stored date uses exactly this layout, so comparing the TEXT values
/// lexicographically orders them chronologically.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Encodes a local wall-clock timestamp for storage (millisecond precision).
#[must_use]
pub fn encode_date(date: NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Decodes a stored timestamp. The fractional part is optional.
pub fn decode_date(value: &str) -> ResultEngine<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|err| EngineError::InvalidRecord(format!("invalid date '{value}': {err}")))
}

/// An expense that has not been persisted yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    pub category: Category,
}

impl ExpenseDraft {
    /// Builds a draft from user input, trimming the name and rejecting
    /// empty names, non-positive amounts and years the date column cannot
    /// hold.
    pub fn new(
        name: &str,
        amount: f64,
        date: NaiveDateTime,
        category: Category,
    ) -> ResultEngine<Self> {
        Ok(Self {
            name: validate::normalize_name(name)?,
            amount: validate::validate_amount(amount)?,
            date: validate::validate_date(date)?,
            category,
        })
    }

    /// Attaches a store id, producing the full record used by updates.
    #[must_use]
    pub fn with_id(self, id: i64) -> Expense {
        Expense {
            id,
            name: self.name,
            amount: self.amount,
            date: self.date,
            category: self.category,
        }
    }
}

/// A persisted expense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    pub category: Category,
}

impl Expense {
    /// The record without its id.
    #[must_use]
    pub fn draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            name: self.name.clone(),
            amount: self.amount,
            date: self.date,
            category: self.category,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub date: String,
    pub category: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ExpenseDraft> for ActiveModel {
    fn from(draft: &ExpenseDraft) -> Self {
        Self {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(draft.name.clone()),
            amount: ActiveValue::Set(draft.amount),
            date: ActiveValue::Set(encode_date(draft.date)),
            category: ActiveValue::Set(draft.category.index()),
        }
    }
}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id),
            name: ActiveValue::Set(expense.name.clone()),
            amount: ActiveValue::Set(expense.amount),
            date: ActiveValue::Set(encode_date(expense.date)),
            category: ActiveValue::Set(expense.category.index()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: decode_date(&model.date)?,
            category: Category::try_from(model.category)?,
            name: model.name,
            amount: model.amount,
        })
    }
}
