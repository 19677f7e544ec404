use clap::Subcommand;
use colored::Colorize;

use tcc_core::NoteKind;
use tcc_session::Command;
use tcc_session::command::parse_note_kind;

use super::Context;

#[derive(Subcommand)]
pub enum NotesAction {
    /// Show notes (default: all three)
    Show {
        /// session, world, or rules
        kind: Option<String>,
    },
    /// Replace one notes field
    Set {
        /// session, world, or rules
        kind: String,
        /// New text
        text: String,
    },
}

pub fn run(ctx: &Context, action: Option<NotesAction>) -> Result<(), String> {
    let mut session = super::open_session(ctx);

    match action.unwrap_or(NotesAction::Show { kind: None }) {
        NotesAction::Set { kind, text } => {
            let kind = parse_note_kind(&kind).map_err(|e| e.to_string())?;
            super::execute(ctx, &mut session, Command::SetNote { kind, text })
        }
        NotesAction::Show { kind } => {
            let kinds = match kind {
                Some(k) => vec![parse_note_kind(&k).map_err(|e| e.to_string())?],
                None => NoteKind::ALL.to_vec(),
            };
            let notes = &session.state().notes;
            for (i, kind) in kinds.into_iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("  {}", format!("{kind} notes").bold());
                let text = notes.get(kind);
                if text.is_empty() {
                    println!("    {}", "(empty)".dimmed());
                }
                for line in text.lines() {
                    println!("    {line}");
                }
            }
            Ok(())
        }
    }
}
