use std::process::ExitCode;

use clap::Parser;
use engine::{Ledger, PreferenceStore};
use migration::{Migrator, MigratorTrait};

use crate::{cli::Cli, error::Result, settings::Settings};

mod cli;
mod commands;
mod error;
mod render;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::new(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spendbook={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {err:?}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let db = parse_database(&settings.database).await?;
    let ledger = Ledger::builder().database(db).build().await?;
    let preferences = PreferenceStore::new(&settings.preferences_path);

    commands::greet_first_launch(&preferences, &mut std::io::stderr().lock())?;

    let mut stdout = std::io::stdout().lock();
    let ctx = commands::Context {
        ledger: &ledger,
        preferences: &preferences,
        currency_symbol: &settings.app.currency_symbol,
        now: chrono::Local::now().naive_local(),
    };
    commands::run(&ctx, cli.command, &mut stdout).await
}

async fn parse_database(config: &settings::Database) -> Result<sea_orm::DatabaseConnection> {
    let url = config.url();
    tracing::debug!(%url, "connecting to database");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
