use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tcc_core::{Ability, BasicsEdit, Character, CharacterText, NewCharacter};
use tcc_session::Command;
use tcc_session::command::{parse_ability, parse_int, parse_lenient, parse_text_field};

use super::{Context, Session};

#[derive(Subcommand)]
pub enum CharAction {
    /// Create a character and select it
    Add {
        /// Character name
        name: String,
        /// Character class
        #[arg(short, long)]
        class: Option<String>,
        /// Level (default 1)
        #[arg(short, long)]
        level: Option<String>,
        /// Maximum hit points (default 10)
        #[arg(long)]
        max_hp: Option<String>,
    },
    /// Change a character's name, class, and level
    Edit {
        /// Character id or name
        who: String,
        /// New name
        name: String,
        /// New class (default: keep)
        #[arg(short, long)]
        class: Option<String>,
        /// New level (default: keep)
        #[arg(short, long)]
        level: Option<String>,
    },
    /// Delete a character
    Delete {
        /// Character id or name
        who: String,
    },
    /// Select a character
    Select {
        /// Character id or name
        who: String,
    },
    /// Set an ability score
    Stat {
        /// Character id or name
        who: String,
        /// str, dex, con, int, wis, or cha
        ability: String,
        /// New score
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Set current and maximum hit points
    Hp {
        /// Character id or name
        who: String,
        /// Current hit points
        #[arg(allow_hyphen_values = true)]
        current: String,
        /// Maximum hit points
        #[arg(allow_hyphen_values = true)]
        max: String,
    },
    /// Set armor class
    Ac {
        /// Character id or name
        who: String,
        /// New armor class
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Set speed
    Speed {
        /// Character id or name
        who: String,
        /// New speed
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Replace spells, inventory, or notes
    Text {
        /// Character id or name
        who: String,
        /// spells, inventory, or notes
        field: String,
        /// New text
        text: String,
    },
    /// List the roster
    List,
    /// Show a character sheet (default: the selected character)
    Show {
        /// Character id or name
        who: Option<String>,
    },
}

pub fn run(ctx: &Context, action: CharAction) -> Result<(), String> {
    let mut session = super::open_session(ctx);

    let command = match action {
        CharAction::List => return list(&session),
        CharAction::Show { who } => return show(&session, who.as_deref()),
        CharAction::Add {
            name,
            class,
            level,
            max_hp,
        } => Command::AddCharacter(NewCharacter {
            name,
            class,
            level: parse_lenient(level.as_deref()),
            max_hp: parse_lenient(max_hp.as_deref()),
        }),
        CharAction::Edit {
            who,
            name,
            class,
            level,
        } => Command::EditCharacter {
            target: who,
            edit: BasicsEdit {
                name,
                class,
                level: parse_lenient(level.as_deref()),
            },
        },
        CharAction::Delete { who } => Command::DeleteCharacter { target: who },
        CharAction::Select { who } => Command::SelectCharacter { target: who },
        CharAction::Stat {
            who,
            ability,
            value,
        } => Command::SetStat {
            target: who,
            ability: parse_ability(&ability).map_err(|e| e.to_string())?,
            value: parse_int("score", &value).map_err(|e| e.to_string())?,
        },
        CharAction::Hp { who, current, max } => Command::SetHp {
            target: who,
            current: parse_int("current HP", &current).map_err(|e| e.to_string())?,
            max: parse_int("max HP", &max).map_err(|e| e.to_string())?,
        },
        CharAction::Ac { who, value } => Command::SetAc {
            target: who,
            value: parse_int("AC", &value).map_err(|e| e.to_string())?,
        },
        CharAction::Speed { who, value } => Command::SetSpeed {
            target: who,
            value: parse_int("speed", &value).map_err(|e| e.to_string())?,
        },
        CharAction::Text { who, field, text } => Command::SetText {
            target: who,
            field: parse_text_field(&field).map_err(|e| e.to_string())?,
            text,
        },
    };

    super::execute(ctx, &mut session, command)
}

fn list(session: &Session) -> Result<(), String> {
    let state = session.state();
    if state.characters.is_empty() {
        println!("  No characters yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Name", "Class", "Lv", "HP", "AC", "Speed"]);

    let selected = state.selected_character_id.as_ref();
    for c in &state.characters {
        let marker = if Some(&c.id) == selected { "*" } else { "" };
        let class = if c.class.is_empty() {
            "—".to_string()
        } else {
            c.class.clone()
        };
        table.add_row(vec![
            marker.to_string(),
            c.name.clone(),
            class,
            c.level.to_string(),
            c.hp.to_string(),
            c.ac.to_string(),
            c.speed.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", state.characters.len());
    Ok(())
}

fn show(session: &Session, who: Option<&str>) -> Result<(), String> {
    let state = session.state();
    let character = match who {
        Some(key) => state
            .find_character(key)
            .ok_or_else(|| format!("character not found: \"{key}\""))?,
        None => state
            .selected_character()
            .ok_or("no character selected; use `tcc char select <who>`")?,
    };
    print_sheet(character);
    Ok(())
}

fn print_sheet(c: &Character) {
    println!("  {} [{}]", c.name.bold(), c.subtitle().dimmed());
    println!("  id: {}", c.id.as_str().dimmed());
    println!();
    println!("  HP {}   AC {}   Speed {}", c.hp, c.ac, c.speed);
    println!();

    let mut table = Table::new();
    table.set_header(Ability::ALL.iter().map(|a| a.label()).collect::<Vec<_>>());
    table.add_row(
        Ability::ALL
            .iter()
            .map(|&a| format!("{} ({:+})", c.stats.get(a), c.stats.modifier(a)))
            .collect::<Vec<_>>(),
    );
    println!("{table}");

    for field in [
        CharacterText::Spells,
        CharacterText::Inventory,
        CharacterText::Notes,
    ] {
        let text = c.text(field);
        if text.is_empty() {
            continue;
        }
        println!();
        println!("  {}:", field.to_string().bold());
        for line in text.lines() {
            println!("    {line}");
        }
    }
}
