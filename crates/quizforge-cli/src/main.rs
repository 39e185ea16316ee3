//! quizforge CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "quizforge",
    version,
    about = "Multiple-choice exam and study sessions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer questions from a bank
    Run {
        /// Path to a .json or .toml question bank
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Questions to include, e.g. "1,5~10,15"
        #[arg(long)]
        range: Option<String>,

        /// Navigation mode: sequential (exam) or free (study)
        #[arg(long)]
        mode: Option<String>,

        /// Shuffle the selected questions
        #[arg(long)]
        shuffle: bool,

        /// Keep bank order even if the config asks for a shuffle
        #[arg(long, conflicts_with_all = ["shuffle", "seed"])]
        no_shuffle: bool,

        /// Seed for a reproducible shuffle (implies --shuffle)
        #[arg(long)]
        seed: Option<u64>,

        /// Report format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show which questions a range expression selects
    Select {
        /// Path to a .json or .toml question bank
        #[arg(long)]
        bank: PathBuf,

        /// Range expression, e.g. "1,5~10,15"
        #[arg(long)]
        range: String,
    },

    /// Validate question bank files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and sample bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge_core=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            bank,
            range,
            mode,
            shuffle,
            no_shuffle,
            seed,
            format,
            config,
        } => commands::run::execute(bank, range, mode, shuffle, no_shuffle, seed, format, config),
        Commands::Select { bank, range } => commands::select::execute(bank, range),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
