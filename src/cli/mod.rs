use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Run a backup: stage every configured path, then replace the previous archive.
    #[command(alias = "s")]
    Save {
        /// Path to the YAML backup configuration.
        #[arg(default_value = "save_files.yml")]
        config: PathBuf,
    },

    /// Print the resolved list of paths a backup would save, without copying anything.
    #[command(alias = "l")]
    List {
        /// Path to the YAML backup configuration.
        #[arg(default_value = "save_files.yml")]
        config: PathBuf,
    },
}

/// Parses command-line arguments using `clap` and returns the command to execute.
///
/// This is the main entry point for the CLI logic.
/// It handles parsing and returns a `Commands` enum variant, or an error if parsing fails.
pub fn run() -> Result<Commands, Box<dyn std::error::Error>> {
    let args = Args::parse();
    Ok(args.command)
}
