use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // AUTOINCREMENT keeps ids monotonic: sqlite never hands out a
        // previously used rowid, not even after `DELETE FROM expenses`.
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Name).text().not_null())
                    .col(ColumnDef::new(Expenses::Amount).double().not_null())
                    .col(ColumnDef::new(Expenses::Date).text().not_null())
                    .col(ColumnDef::new(Expenses::Category).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-date")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx-expenses-date")
                    .table(Expenses::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub enum Expenses {
    Table,
    Id,
    Name,
    Amount,
    Date,
    Category,
}
