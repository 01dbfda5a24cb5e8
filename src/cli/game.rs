//! Game CLI commands
//!
//! Implements the per-game commands: listing, backup, restore, delete, info
//! and checksums.

use clap::Subcommand;

use super::progress::Spinner;
use crate::backup::{checksum_all, BackupManager, RestoreManager};
use crate::display::{format_checksums, format_game_details, format_game_info, format_timestamp};
use crate::error::{SaverError, SaverResult};
use crate::models::{Game, SaveIndex, SaveRange};
use crate::storage::Storage;

/// Game subcommands
#[derive(Subcommand)]
pub enum GameCommands {
    /// List the game's saves
    List,

    /// Back up the current save
    Backup {
        /// Note to attach to the save
        note: Option<String>,
    },

    /// Restore a save over the current one
    Restore {
        /// Save ID (1 = oldest), or offset from the newest (0 = newest, -1, ...)
        #[arg(allow_hyphen_values = true)]
        index: String,
    },

    /// Delete a save or an inclusive range of saves
    Delete {
        /// Save ID or `from-to`
        range: String,
    },

    /// Show where the game's files are kept
    Info {
        /// Print only the latest save path
        #[arg(short, long)]
        short: bool,
    },

    /// Print a checksum for every save
    Checksum {
        /// Print save paths instead of IDs and dates
        #[arg(short, long)]
        short: bool,
    },
}

/// Handle a game command
pub fn handle_game_command(
    storage: &mut Storage,
    name: &str,
    cmd: GameCommands,
    verbose: bool,
) -> SaverResult<()> {
    match cmd {
        GameCommands::List => {
            let game = require_game(storage, name)?;
            print!("{}", format_game_details(game, verbose));
        }

        GameCommands::Backup { note } => {
            let game = storage.registry_mut().require_game_mut(name)?;
            let spinner = Spinner::start(format!("Backing up {}...", game.source_path.display()));
            let result = BackupManager::new(game).backup(note.as_deref());
            spinner.finish();
            let save = result?;

            storage.mark_dirty();
            println!("Backed up at {}", format_timestamp(&save.timestamp));
        }

        GameCommands::Restore { index } => {
            let game = storage.registry_mut().require_game_mut(name)?;
            if game.is_empty() {
                return Err(SaverError::NoSaves(name.to_string()));
            }
            let index: SaveIndex = index.parse()?;

            let spinner = Spinner::start("Restoring save...");
            let result = RestoreManager::new(game).restore(index);
            spinner.finish();
            let restored = result?;

            storage.mark_dirty();
            println!(
                "Restored save from {}",
                format_timestamp(&restored.save.timestamp)
            );
        }

        GameCommands::Delete { range } => {
            let game = storage.registry_mut().require_game_mut(name)?;
            if game.is_empty() {
                return Err(SaverError::NoSaves(name.to_string()));
            }
            let range: SaveRange = range.parse()?;

            let spinner = Spinner::start("Deleting saves...");
            let result = BackupManager::new(game).delete(range);
            spinner.finish();
            let report = result?;

            // Partial progress is kept even when the delete stopped early
            storage.mark_dirty();
            if let Some(e) = &report.failure {
                eprintln!("ERROR: {}", e);
            }
            println!("Deleted {} save(s)", report.count());
        }

        GameCommands::Info { short } => {
            let game = require_game(storage, name)?;
            print!("{}", format_game_info(game, short));
        }

        GameCommands::Checksum { short } => {
            let game = require_game(storage, name)?;
            print!("{}", format_checksums(&checksum_all(game), short));
        }
    }

    Ok(())
}

fn require_game<'a>(storage: &'a Storage, name: &str) -> SaverResult<&'a Game> {
    storage
        .registry()
        .get_game(name)
        .ok_or_else(|| SaverError::game_not_found(name))
}
