//! Main entry point for the packrat CLI app

use packrat::cli::{self, Commands};
use packrat::config::Config;
use packrat::saver::DataSaver;
use packrat::tree;
use std::path::Path;
use std::time::Instant;

fn main() -> std::process::ExitCode {
    if let Err(e) = run_app() {
        if e.downcast_ref::<clap::Error>().is_none() {
            eprintln!("Error: {}", e);
        }
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

fn run_app() -> Result<(), Box<dyn std::error::Error>> {
    let command = cli::run()?;

    match &command {
        Commands::Save { config } => {
            let start = Instant::now();
            let config = Config::load(config)?;
            println!("Saving files into: {}", config.save_destination.display());

            let elements = tree::flatten(&config.save, Path::new("."));
            let saver = DataSaver::new(elements, config.save_destination, config.ignore)?;
            saver.save_elements()?;

            println!("Done in {:.2} seconds.", start.elapsed().as_secs_f64());
        }
        Commands::List { config } => {
            let config = Config::load(config)?;
            for element in tree::flatten(&config.save, Path::new(".")) {
                println!("{}", element.display());
            }
        }
    }

    Ok(())
}
