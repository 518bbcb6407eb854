//! Applies the expense ledger schema to a database.
//!
//! Usage: `migration [up|down|fresh|status] [database-url]`. The url falls
//! back to `SPENDBOOK_DATABASE_URL`, then to `./spendbook.db`.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./spendbook.db?mode=rwc";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());
    let db_url = args
        .next()
        .or_else(|| std::env::var("SPENDBOOK_DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => migration::Migrator::down(&db, None).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        other => {
            eprintln!("unknown command '{other}'");
            eprintln!("Usage: migration [up|down|fresh|status] [database-url]");
            std::process::exit(2);
        }
    }

    Ok(())
}
