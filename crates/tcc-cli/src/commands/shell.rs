use std::io::{self, BufRead, Write};

use colored::Colorize;

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let mut session = super::open_session(ctx);

    println!(
        "  {} {}",
        "Tabletop Control Center".bold(),
        session.state().campaign_name.dimmed()
    );
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        let prompt = if session.pending().is_some() { "? " } else { "> " };
        print!("{prompt}");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() && session.pending().is_none() {
            continue;
        }
        let quitting = session.pending().is_none()
            && matches!(input.to_lowercase().as_str(), "quit" | "q" | "exit");

        match session.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if quitting {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}
