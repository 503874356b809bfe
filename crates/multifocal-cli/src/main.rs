//! multifocal CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "multifocal", version, about = "Multifocal lens addition calculator")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate an addition and save it to the history
    Calc(commands::calc::CalcArgs),

    /// Review, export and delete saved calculations
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// Interactive session: edit fields, calculate, browse history
    Shell,

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List one page of calculations, newest first
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Show every field of one calculation
    Show {
        /// Calculation id
        id: String,
    },

    /// Delete one calculation
    Delete {
        /// Calculation id
        id: String,
    },

    /// Delete every calculation (asks for confirmation)
    Clear {
        /// Confirm without prompting
        #[arg(long)]
        yes: bool,
    },

    /// Print the history for the clipboard or a speech synthesizer
    Export {
        /// Output format: text, speech, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("multifocal=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Calc(args) => commands::calc::execute(args, config),
        Commands::History { action } => match action {
            HistoryCommand::List { page } => commands::history::list(page, config),
            HistoryCommand::Show { id } => commands::history::show(&id, config),
            HistoryCommand::Delete { id } => commands::history::delete(&id, config),
            HistoryCommand::Clear { yes } => commands::history::clear(yes, config),
            HistoryCommand::Export { format, output } => {
                commands::history::export(&format, output, config)
            }
        },
        Commands::Shell => commands::shell::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
