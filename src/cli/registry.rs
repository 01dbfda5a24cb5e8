//! Registry-level CLI commands
//!
//! Implements adding, removing and listing games, and format migration.

use std::path::Path;

use super::progress::Spinner;
use crate::display::{format_game_header, format_game_list, format_game_row};
use crate::error::SaverResult;
use crate::storage::Storage;

/// Register a new game and print its row
pub fn handle_add(storage: &mut Storage, name: &str, path: &Path) -> SaverResult<()> {
    let game = storage.registry_mut().add_game(name, path)?;
    println!("{}", format_game_header());
    println!("{}", format_game_row(game));
    storage.mark_dirty();
    Ok(())
}

/// Remove a game together with all of its backups
pub fn handle_del(storage: &mut Storage, name: &str) -> SaverResult<()> {
    storage.registry_mut().remove_game(name)?;
    storage.mark_dirty();
    println!("Deleted game \"{}\" and all backed up saves", name);
    Ok(())
}

/// Print the game table
pub fn handle_list(storage: &Storage, verbose: bool) {
    print!("{}", format_game_list(storage.registry(), verbose));
}

/// Upgrade the registry to the current format version
pub fn handle_migrate(storage: &mut Storage) -> SaverResult<()> {
    let spinner = Spinner::start("Migrating...");
    let result = storage
        .registry_mut()
        .migrate(|msg| spinner.message(msg.to_string()));
    spinner.finish();
    let report = result?;

    for version in &report.applied {
        println!("Migrating -> {}", version);
    }
    if !report.is_noop() {
        println!("Backfilled {} save size(s)", report.sizes_backfilled);
        storage.mark_dirty();
    }
    println!("All done");
    Ok(())
}
