//! Backup, restore and reset commands.

use std::path::PathBuf;

use clap::Subcommand;

use super::{open_tracker, CliClock, CliResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export habits and progress as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace all habits and progress from an export file
    Import {
        /// Path to an export file
        file: PathBuf,
    },
    /// Delete all habit data
    Clear {
        /// Required to actually delete
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction, clock: CliClock) -> CliResult {
    let mut tracker = open_tracker(clock)?;

    match action {
        DataAction::Export { output } => {
            let json = tracker.export_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        DataAction::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            tracker.import_json(&json)?;
            println!("imported {} habits", tracker.store().len());
        }
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear data without --yes".into());
            }
            tracker.clear_all()?;
            println!("all habit data cleared");
        }
    }
    Ok(())
}
