//! Subcommand handlers.
//!
//! Every handler re-reads the ledger after a mutation instead of keeping
//! any state of its own.

use std::io::Write;

use chrono::NaiveDateTime;
use engine::{
    EngineError, Expense, ExpenseDraft, Ledger, PreferenceStore, Summary, ThemeMode, encode_date,
    reports, validate,
};
use serde::Serialize;

use crate::{
    cli::{AddArgs, BudgetCommand, Command, EditArgs, ListArgs, ReportArgs},
    error::{AppError, Result},
    render,
};

/// What every handler needs.
pub struct Context<'a> {
    pub ledger: &'a Ledger,
    pub preferences: &'a PreferenceStore,
    pub currency_symbol: &'a str,
    /// Reference time for defaults and reports.
    pub now: NaiveDateTime,
}

/// Prints the welcome note once and clears the first-launch flag.
///
/// `notice` is never stdout, which carries command output only.
pub fn greet_first_launch(preferences: &PreferenceStore, notice: &mut dyn Write) -> Result<()> {
    let mut prefs = preferences.load()?;
    if prefs.complete_first_launch() {
        tracing::info!(path = %preferences.path().display(), "first launch");
        writeln!(
            notice,
            "Welcome to spendbook! Record an expense with `spendbook add --name <name> --amount <amount>`."
        )?;
        preferences.save(&prefs)?;
    }
    Ok(())
}

pub async fn run(ctx: &Context<'_>, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Add(args) => add(ctx, args, out).await,
        Command::List(args) => list(ctx, args, out).await,
        Command::Show { id } => show(ctx, id, out).await,
        Command::Edit(args) => edit(ctx, args, out).await,
        Command::Delete { id } => delete(ctx, id, out).await,
        Command::Clear { yes } => clear(ctx, yes, out).await,
        Command::Report(args) => report(ctx, args, out).await,
        Command::Budget(budget) => budget_cmd(ctx, budget.command, out).await,
        Command::Theme { mode } => theme(ctx, mode.as_deref(), out),
        Command::Export { out: path } => export(ctx, path.as_deref(), out).await,
    }
}

fn not_found(id: i64) -> AppError {
    EngineError::NotFound(format!("expense {id}")).into()
}

async fn add(ctx: &Context<'_>, args: AddArgs, out: &mut dyn Write) -> Result<()> {
    let amount = validate::parse_amount(&args.amount)?;
    let draft = ExpenseDraft::new(
        &args.name,
        amount,
        args.date.unwrap_or(ctx.now),
        args.category,
    )?;
    let id = ctx.ledger.create(&draft).await?;
    tracing::info!(id, "expense recorded");
    writeln!(out, "added expense {id}")?;
    Ok(())
}

async fn list(ctx: &Context<'_>, args: ListArgs, out: &mut dyn Write) -> Result<()> {
    let expenses = match (args.from, args.to, args.category) {
        (Some(from), Some(to), _) => ctx.ledger.list_by_date_range(from, to).await?,
        (_, _, Some(category)) => ctx.ledger.list_by_category(category).await?,
        _ => ctx.ledger.list().await?,
    };

    if expenses.is_empty() {
        writeln!(out, "no expenses")?;
        return Ok(());
    }
    for expense in &expenses {
        writeln!(out, "{}", render::expense_line(expense, ctx.currency_symbol))?;
    }
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    writeln!(
        out,
        "{} expenses, total {}",
        expenses.len(),
        render::money(total, ctx.currency_symbol)
    )?;
    Ok(())
}

async fn show(ctx: &Context<'_>, id: i64, out: &mut dyn Write) -> Result<()> {
    let expense = ctx.ledger.get(id).await?.ok_or_else(|| not_found(id))?;
    writeln!(out, "{}", render::expense_detail(&expense, ctx.currency_symbol))?;
    Ok(())
}

async fn edit(ctx: &Context<'_>, args: EditArgs, out: &mut dyn Write) -> Result<()> {
    let current = ctx.ledger.get(args.id).await?.ok_or_else(|| not_found(args.id))?;

    let name = args.name.unwrap_or(current.name);
    let amount = match args.amount {
        Some(raw) => validate::parse_amount(&raw)?,
        None => current.amount,
    };
    let replacement = ExpenseDraft::new(
        &name,
        amount,
        args.date.unwrap_or(current.date),
        args.category.unwrap_or(current.category),
    )?
    .with_id(current.id);

    if ctx.ledger.update(&replacement).await? == 0 {
        return Err(not_found(args.id));
    }
    tracing::info!(id = args.id, "expense replaced");
    writeln!(out, "updated expense {}", args.id)?;
    Ok(())
}

async fn delete(ctx: &Context<'_>, id: i64, out: &mut dyn Write) -> Result<()> {
    if ctx.ledger.delete(id).await? == 0 {
        return Err(not_found(id));
    }
    tracing::info!(id, "expense deleted");
    writeln!(out, "deleted expense {id}")?;
    Ok(())
}

async fn clear(ctx: &Context<'_>, yes: bool, out: &mut dyn Write) -> Result<()> {
    if !yes {
        return Err(AppError::Usage(
            "refusing to delete every expense without --yes".to_string(),
        ));
    }
    let removed = ctx.ledger.delete_all().await?;
    tracing::info!(removed, "ledger cleared");
    writeln!(out, "deleted {removed} expenses")?;
    Ok(())
}

async fn report(ctx: &Context<'_>, args: ReportArgs, out: &mut dyn Write) -> Result<()> {
    let symbol = ctx.currency_symbol;
    let snapshot = ctx.ledger.list().await?;
    let budget = ctx.preferences.load()?.budget();
    let summary = Summary::compute(&snapshot, budget.unwrap_or_default(), ctx.now);

    writeln!(out, "report for {}", summary.today)?;
    writeln!(out, "today:    {}", render::money(summary.total_today, symbol))?;
    writeln!(out, "week:     {}", render::money(summary.total_this_week, symbol))?;
    writeln!(out, "month:    {}", render::money(summary.total_this_month, symbol))?;
    writeln!(
        out,
        "{}",
        render::budget_line(summary.total_this_month, budget, &summary.budget, symbol)
    )?;

    let daily = reports::daily_series(&snapshot, ctx.now, args.days);
    let daily_max = daily.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    writeln!(out, "\nlast {} days", args.days)?;
    for (ago, total) in daily {
        let day = summary.today - chrono::Days::new(u64::from(ago));
        writeln!(
            out,
            "{day}  {:>12}  {}",
            render::money(total, symbol),
            render::bar(total, daily_max)
        )?;
    }

    let monthly = reports::monthly_series(&snapshot, ctx.now, args.months);
    let monthly_max = monthly.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    writeln!(out, "\nlast {} months", args.months)?;
    let current_month = reports::first_of_month(ctx.now);
    for (ago, total) in monthly {
        let label = current_month
            .checked_sub_months(chrono::Months::new(ago))
            .map(|m| m.format("%Y-%m").to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{label:<10}  {:>12}  {}",
            render::money(total, symbol),
            render::bar(total, monthly_max)
        )?;
    }

    writeln!(out, "\nby category")?;
    for (category, share) in reports::category_shares(&summary.by_category) {
        let amount = summary.by_category.get(&category).copied().unwrap_or_default();
        writeln!(out, "{}", render::category_line(category, amount, share, symbol))?;
    }
    Ok(())
}

async fn budget_cmd(
    ctx: &Context<'_>,
    command: Option<BudgetCommand>,
    out: &mut dyn Write,
) -> Result<()> {
    let symbol = ctx.currency_symbol;
    match command {
        Some(BudgetCommand::Set { amount }) => {
            let amount = validate::parse_amount(&amount)?;
            ctx.preferences.update(|prefs| prefs.set_monthly_budget(amount))?;
            tracing::info!(amount, "monthly budget set");
            writeln!(out, "monthly budget set to {}", render::money(amount, symbol))?;
        }
        Some(BudgetCommand::Clear) => {
            ctx.preferences.update(|prefs| prefs.set_monthly_budget(0.0))?;
            writeln!(out, "monthly budget cleared")?;
        }
        None => {
            let budget = ctx.preferences.load()?.budget();
            let now = ctx.now;
            let month = ctx
                .ledger
                .list_by_date_range(
                    reports::first_of_month(now),
                    reports::first_of_next_month(now),
                )
                .await?;
            let spent = reports::total_this_month(&month, now);
            let progress = reports::budget_progress(spent, budget.unwrap_or_default());
            writeln!(out, "{}", render::budget_line(spent, budget, &progress, symbol))?;
        }
    }
    Ok(())
}

fn theme(ctx: &Context<'_>, mode: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let prefs = match mode {
        Some(raw) => {
            let mode = ThemeMode::try_from(raw)?;
            ctx.preferences.update(|prefs| prefs.set_theme_mode(mode))?
        }
        None => ctx.preferences.load()?,
    };
    writeln!(out, "theme: {}", prefs.theme_mode.as_str())?;
    Ok(())
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: i64,
    date: String,
    name: &'a str,
    amount: f64,
    category: &'static str,
}

impl<'a> From<&'a Expense> for ExportRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            id: expense.id,
            date: encode_date(expense.date),
            name: &expense.name,
            amount: expense.amount,
            category: expense.category.label(),
        }
    }
}

async fn export(ctx: &Context<'_>, path: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let expenses = ctx.ledger.list().await?;
    match path {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path)?;
            for expense in &expenses {
                writer.serialize(ExportRow::from(expense))?;
            }
            writer.flush()?;
            tracing::info!(path, rows = expenses.len(), "ledger exported");
            writeln!(out, "exported {} expenses to {path}", expenses.len())?;
        }
        None => {
            let mut writer = csv::Writer::from_writer(out);
            for expense in &expenses {
                writer.serialize(ExportRow::from(expense))?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
