//! CLI frontend for Tabletop Control Center.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::Context;

#[derive(Parser)]
#[command(
    name = "tcc",
    about = "Tabletop Control Center: characters, initiative, notes, and dice for your campaign",
    version,
    propagate_version = true
)]
struct Cli {
    /// Store file holding the campaign (default: platform config directory)
    #[arg(long, global = true, env = "TCC_STORE")]
    store: Option<PathBuf>,

    /// RNG seed for reproducible dice rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the campaign overview, or rename the campaign
    Campaign {
        /// New campaign name
        name: Option<String>,
    },

    /// Manage the character roster
    #[command(name = "char")]
    Character {
        #[command(subcommand)]
        action: commands::character::CharAction,
    },

    /// Manage the initiative tracker
    Init {
        #[command(subcommand)]
        action: commands::initiative::InitAction,
    },

    /// Roll dice notation such as d20, 3d6+2, 2d8-1
    Roll {
        /// Dice expression
        #[arg(allow_hyphen_values = true)]
        expr: String,
    },

    /// Roll two d20 and keep the higher
    Adv,

    /// Roll two d20 and keep the lower
    Dis,

    /// Show recent dice rolls, most recent first
    History {
        /// Show at most this many rolls
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show or edit session, world, and rules notes
    Notes {
        #[command(subcommand)]
        action: Option<commands::notes::NotesAction>,
    },

    /// Export the campaign as pretty-printed JSON
    Export {
        /// Output file (default: tcc_campaign_<millis>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Merge a JSON export into the current campaign
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Restore the default, empty campaign
    Reset,

    /// Start an interactive shell
    Shell,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tcc=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = Context {
        store: cli.store,
        seed: cli.seed,
        yes: cli.yes,
    };

    let result = match cli.command {
        Commands::Campaign { name } => commands::campaign::run(&ctx, name.as_deref()),
        Commands::Character { action } => commands::character::run(&ctx, action),
        Commands::Init { action } => commands::initiative::run(&ctx, action),
        Commands::Roll { expr } => commands::dice::roll(&ctx, &expr),
        Commands::Adv => commands::dice::d20(&ctx, tcc_mechanics::AdvantageMode::Advantage),
        Commands::Dis => commands::dice::d20(&ctx, tcc_mechanics::AdvantageMode::Disadvantage),
        Commands::History { limit } => commands::dice::history(&ctx, limit),
        Commands::Notes { action } => commands::notes::run(&ctx, action),
        Commands::Export { output, stdout } => {
            commands::data::export(&ctx, output.as_deref(), stdout)
        }
        Commands::Import { file } => commands::data::import(&ctx, &file),
        Commands::Reset => commands::data::reset(&ctx),
        Commands::Shell => commands::shell::run(&ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
