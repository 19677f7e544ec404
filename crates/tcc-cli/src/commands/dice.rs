use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tcc_core::DiceRoll;
use tcc_mechanics::{AdvantageMode, DiceExpr};

use super::Context;

pub fn roll(ctx: &Context, expr: &str) -> Result<(), String> {
    let expr = DiceExpr::parse(expr).map_err(|e| e.to_string())?;
    let mut session = super::open_session(ctx);
    let entry = session.roll(expr).map_err(|e| e.to_string())?;
    print_roll(&entry);
    Ok(())
}

pub fn d20(ctx: &Context, mode: AdvantageMode) -> Result<(), String> {
    let mut session = super::open_session(ctx);
    let entry = session.roll_advantage(mode);
    print_roll(&entry);
    Ok(())
}

fn print_roll(entry: &DiceRoll) {
    println!("  {}", entry.total.to_string().bold());
    println!("  {}", entry.to_string().dimmed());
}

pub fn history(ctx: &Context, limit: Option<usize>) -> Result<(), String> {
    let session = super::open_session(ctx);
    let history = &session.state().dice_history;
    if history.is_empty() {
        println!("  No rolls yet.");
        return Ok(());
    }

    let shown = limit.unwrap_or(history.len()).min(history.len());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time (UTC)", "Roll", "Dice", "Total"]);
    for entry in &history.entries()[..shown] {
        table.add_row(vec![
            entry.timestamp.format("%H:%M:%S").to_string(),
            entry.summary(),
            format!("[{}]", join(&entry.rolls)),
            entry.total.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {shown} of {} rolls", history.len());
    Ok(())
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
