use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tcc_core::{CombatantEdit, CombatantKind, NewCombatant};
use tcc_session::Command;
use tcc_session::command::{parse_int, parse_lenient};

use super::{Context, Session};

#[derive(Subcommand)]
pub enum InitAction {
    /// Append a combatant (unsorted)
    Add {
        /// Combatant name
        name: String,
        /// Initiative value
        #[arg(allow_hyphen_values = true)]
        initiative: String,
        /// Hit points (default 0)
        #[arg(long, allow_hyphen_values = true)]
        hp: Option<String>,
        /// pc, npc, enemy, or any label
        #[arg(short = 't', long = "type", default_value = "pc")]
        kind: String,
    },
    /// Replace a combatant's fields in place
    Edit {
        /// Combatant id or name
        who: String,
        /// New name
        name: String,
        /// New initiative value
        #[arg(allow_hyphen_values = true)]
        initiative: String,
        /// Hit points (default: keep)
        #[arg(long, allow_hyphen_values = true)]
        hp: Option<String>,
        /// pc, npc, enemy, or any label (default: keep)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },
    /// Remove a combatant
    Remove {
        /// Combatant id or name
        who: String,
    },
    /// Sort by descending initiative
    Sort,
    /// Advance to the next turn
    Next,
    /// Remove every combatant and reset the round
    Clear,
    /// Add to a combatant's hit points (negative for damage)
    Hp {
        /// Combatant id or name
        who: String,
        /// Signed change, e.g. -7 or 4
        #[arg(allow_hyphen_values = true)]
        delta: String,
    },
    /// Show the turn order
    List,
}

fn combatant(
    name: String,
    initiative: &str,
    hp: Option<&str>,
    kind: &str,
) -> Result<NewCombatant, String> {
    Ok(NewCombatant {
        name,
        initiative: parse_int("initiative", initiative).map_err(|e| e.to_string())?,
        hp: parse_lenient(hp),
        kind: CombatantKind::from(kind),
    })
}

pub fn run(ctx: &Context, action: InitAction) -> Result<(), String> {
    let mut session = super::open_session(ctx);

    let command = match action {
        InitAction::List => return list(&session),
        InitAction::Add {
            name,
            initiative,
            hp,
            kind,
        } => Command::AddCombatant(combatant(name, &initiative, hp.as_deref(), &kind)?),
        InitAction::Edit {
            who,
            name,
            initiative,
            hp,
            kind,
        } => Command::EditCombatant {
            target: who,
            edit: CombatantEdit {
                name,
                initiative: parse_int("initiative", &initiative).map_err(|e| e.to_string())?,
                hp: parse_lenient(hp.as_deref()),
                kind: kind.as_deref().map(CombatantKind::from),
            },
        },
        InitAction::Remove { who } => Command::RemoveCombatant { target: who },
        InitAction::Sort => Command::SortInitiative,
        InitAction::Next => Command::NextTurn,
        InitAction::Clear => Command::ClearInitiative,
        InitAction::Hp { who, delta } => Command::AdjustHp {
            target: who,
            delta: parse_int("HP change", &delta).map_err(|e| e.to_string())?,
        },
    };

    super::execute(ctx, &mut session, command)
}

fn list(session: &Session) -> Result<(), String> {
    let tracker = &session.state().initiative;
    if tracker.is_empty() {
        println!("  No combatants.");
        return Ok(());
    }

    println!("  {}", format!("Round {}", tracker.round()).bold());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "#", "Name", "Init", "HP", "Type"]);

    for (i, c) in tracker.combatants().iter().enumerate() {
        let marker = if tracker.current_index() == Some(i) {
            "▶"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            (i + 1).to_string(),
            c.name.clone(),
            c.initiative.to_string(),
            c.hp.to_string(),
            c.kind.to_string(),
        ]);
    }

    println!("{table}");
    if tracker.is_idle() {
        println!();
        println!("  {}", "Not started. Run `tcc init next` to begin.".dimmed());
    }
    Ok(())
}
