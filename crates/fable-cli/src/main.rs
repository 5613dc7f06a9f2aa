//! CLI frontend for the Fable story player.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use fable_story::NapDecision;

#[derive(Parser)]
#[command(
    name = "fable",
    about = "Fable: The Tortoise and the Hare, played headless",
    version,
    propagate_version = true
)]
struct Cli {
    /// Stage config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the story from the first scene to the Play Again button
    Play {
        /// Nap decisions in order, e.g. sleep,sleep,cheer (cheers once exhausted)
        #[arg(short, long, value_delimiter = ',')]
        nap: Vec<NapDecision>,

        /// Start as a mobile device that finds a surface (default: desktop fallback)
        #[arg(long)]
        ar: bool,

        /// Also show animations, moves and discarded continuations
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the scenes in story order
    Scenes,

    /// Load one scene and print its scene tree
    Show {
        /// Scene index (0-based)
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// Virtual milliseconds to run before dumping
        #[arg(long, default_value = "0")]
        at: u64,

        /// Render into the fallback container instead of the AR anchor
        #[arg(long)]
        fallback: bool,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Play { nap, ar, verbose } => commands::play::run(config, &nap, ar, verbose),
        Commands::Scenes => commands::scenes::run(config),
        Commands::Show {
            index,
            at,
            fallback,
            json,
        } => commands::show::run(config, index, at, fallback, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
