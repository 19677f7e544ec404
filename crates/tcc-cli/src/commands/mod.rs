pub mod campaign;
pub mod character;
pub mod data;
pub mod dice;
pub mod initiative;
pub mod notes;
pub mod shell;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;

use tcc_session::{CampaignSession, Command, FileStore, SessionConfig};

/// Global options shared by every subcommand.
pub struct Context {
    pub store: Option<PathBuf>,
    pub seed: Option<u64>,
    pub yes: bool,
}

pub type Session = CampaignSession<FileStore>;

/// Open the campaign session backed by the configured store file.
pub fn open_session(ctx: &Context) -> Session {
    let store = match &ctx.store {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default(),
    };
    tracing::debug!(path = %store.path().display(), "opened campaign store");
    let mut config = SessionConfig::default();
    if let Some(seed) = ctx.seed {
        config = config.with_seed(seed);
    }
    CampaignSession::new(store, config)
}

/// Apply a command, asking for confirmation first when it is destructive.
pub fn execute(ctx: &Context, session: &mut Session, command: Command) -> Result<(), String> {
    if command.requires_confirmation() && !ctx.yes {
        let prompt = session.confirmation_prompt(&command);
        if !confirm(&prompt)? {
            println!("  Cancelled.");
            return Ok(());
        }
    }
    let output = session.apply(command).map_err(|e| e.to_string())?;
    print_message(&output);
    Ok(())
}

/// Print a status line; "not found" results are highlighted.
pub fn print_message(message: &str) {
    if message.is_empty() {
        return;
    }
    if message.contains("not found") {
        println!("  {}", message.yellow());
    } else {
        for line in message.lines() {
            println!("  {line}");
        }
    }
}

/// Ask a yes/no question on stdin. EOF counts as no.
fn confirm(prompt: &str) -> Result<bool, String> {
    print!("  {} ", prompt.bold());
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| e.to_string())?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
