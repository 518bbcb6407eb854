//! The ledger store: durable CRUD and range queries over the `expenses`
//! table.
//!
//! The store never validates what it is given and never retries; any
//! storage failure comes back as [`EngineError::Database`](crate::EngineError::Database).

use chrono::NaiveDateTime;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, Select, prelude::*};

use crate::{
    Category, CategoryTotals, Expense, ExpenseDraft, ResultEngine,
    expenses::{self, encode_date},
    reports::empty_totals,
};

/// Owner of the database connection backing the expense ledger.
///
/// Build it once at start-up and pass it around by reference.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// Persists a new expense and returns the id assigned by the database.
    pub async fn create(&self, draft: &ExpenseDraft) -> ResultEngine<i64> {
        let result = expenses::Entity::insert(expenses::ActiveModel::from(draft))
            .exec(&self.database)
            .await?;
        tracing::debug!(id = result.last_insert_id, "expense created");
        Ok(result.last_insert_id)
    }

    /// Looks an expense up by id.
    pub async fn get(&self, id: i64) -> ResultEngine<Option<Expense>> {
        expenses::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Expense::try_from)
            .transpose()
    }

    /// Every expense, newest first. Equal dates keep insertion order.
    pub async fn list(&self) -> ResultEngine<Vec<Expense>> {
        Self::collect(
            Self::ordered(expenses::Entity::find())
                .all(&self.database)
                .await?,
        )
    }

    /// Expenses dated within `[start, end]`, newest first.
    ///
    /// Bounds are compared at the millisecond resolution of the stored
    /// encoding.
    pub async fn list_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ResultEngine<Vec<Expense>> {
        let query = expenses::Entity::find()
            .filter(expenses::Column::Date.gte(encode_date(start)))
            .filter(expenses::Column::Date.lte(encode_date(end)));
        Self::collect(Self::ordered(query).all(&self.database).await?)
    }

    /// Expenses of a single category, newest first.
    pub async fn list_by_category(&self, category: Category) -> ResultEngine<Vec<Expense>> {
        let query = expenses::Entity::find()
            .filter(expenses::Column::Category.eq(category.index()));
        Self::collect(Self::ordered(query).all(&self.database).await?)
    }

    /// Number of stored expenses.
    pub async fn count(&self) -> ResultEngine<u64> {
        Ok(expenses::Entity::find().count(&self.database).await?)
    }

    /// Replaces every field of the record with the same id.
    ///
    /// Returns the number of rows touched: 0 when the id does not exist, in
    /// which case nothing is inserted.
    pub async fn update(&self, expense: &Expense) -> ResultEngine<u64> {
        let mut active = expenses::ActiveModel::from(expense);
        active.id = sea_orm::ActiveValue::NotSet;
        let result = expenses::Entity::update_many()
            .set(active)
            .filter(expenses::Column::Id.eq(expense.id))
            .exec(&self.database)
            .await?;
        tracing::debug!(
            id = expense.id,
            rows = result.rows_affected,
            "expense updated"
        );
        Ok(result.rows_affected)
    }

    /// Deletes one expense. Returns 1 if it existed, 0 otherwise.
    pub async fn delete(&self, id: i64) -> ResultEngine<u64> {
        let result = expenses::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        tracing::debug!(id, rows = result.rows_affected, "expense deleted");
        Ok(result.rows_affected)
    }

    /// Deletes every expense and returns how many were removed.
    pub async fn delete_all(&self) -> ResultEngine<u64> {
        let result = expenses::Entity::delete_many()
            .exec(&self.database)
            .await?;
        tracing::debug!(rows = result.rows_affected, "ledger cleared");
        Ok(result.rows_affected)
    }

    /// Sum of amounts per category, computed by the database.
    ///
    /// Categories without expenses are present with `0.0`.
    pub async fn totals_by_category(&self) -> ResultEngine<CategoryTotals> {
        let rows: Vec<(i32, Option<f64>)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(expenses::Column::Amount.sum(), "total")
            .group_by(expenses::Column::Category)
            .into_tuple()
            .all(&self.database)
            .await?;

        let mut totals = empty_totals();
        for (index, total) in rows {
            let category = Category::try_from(index)?;
            totals.insert(category, total.unwrap_or_default());
        }
        Ok(totals)
    }

    fn ordered(query: Select<expenses::Entity>) -> Select<expenses::Entity> {
        query
            .order_by_desc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
    }

    fn collect(models: Vec<expenses::Model>) -> ResultEngine<Vec<Expense>> {
        models.into_iter().map(Expense::try_from).collect()
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`
    pub async fn build(self) -> ResultEngine<Ledger> {
        Ok(Ledger {
            database: self.database,
        })
    }
}
