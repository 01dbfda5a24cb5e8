//! Game display formatting
//!
//! Formats games for terminal output: the registry table, a single game with
//! its saves, the info block and checksum listings.

use super::format::{format_size, format_timestamp};
use super::save::format_save_list;
use crate::backup::ChecksumEntry;
use crate::models::Game;
use crate::storage::Registry;

/// Header row for a game table
pub fn format_game_header() -> String {
    format!(
        "{:<32} {:<9} {:>24} {:>8}",
        "Name", "# Backups", "Last backup", "Size"
    )
}

/// One game row
pub fn format_game_row(game: &Game) -> String {
    format!(
        "{:<32} {:<9} {:>24} {:>8}",
        game.name,
        game.len(),
        format_timestamp(&game.last_modified),
        format_size(game.total_size)
    )
}

/// Format every registered game as a numbered table
pub fn format_game_list(registry: &Registry, verbose: bool) -> String {
    if registry.is_empty() {
        return "No games defined\n".to_string();
    }

    let mut output = String::new();
    if verbose {
        output.push_str(&format!("Config version: {}\n\n", registry.format_version));
    }

    output.push_str(&format!("{:>3} {}\n", "#", format_game_header()));
    for (i, game) in registry.games.iter().enumerate() {
        output.push_str(&format!("{:>3} {}\n", i + 1, format_game_row(game)));
    }
    output.push('\n');
    output
}

/// Format a single game followed by its save history
pub fn format_game_details(game: &Game, verbose: bool) -> String {
    let mut output = String::new();
    output.push_str(&format_game_header());
    output.push('\n');
    output.push_str(&format_game_row(game));
    output.push_str("\n\n");

    if !game.is_empty() {
        output.push_str(&format_save_list(&game.saves, verbose));
        output.push('\n');
    }
    output
}

/// Format where a game's files live
///
/// Short mode prints only the latest artifact path.
pub fn format_game_info(game: &Game, short: bool) -> String {
    let info = game.info();
    let latest = info
        .latest_save
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());

    if short {
        return format!("{}\n", latest);
    }

    format!(
        " Game files in: {}\nSaved stuff in: {}\nLatest save at: {}\n",
        info.source_path.display(),
        info.archive_root.display(),
        latest
    )
}

/// Format one line per checksummed save
///
/// An unreadable artifact prints its error in place of the digest.
pub fn format_checksums(entries: &[ChecksumEntry], short: bool) -> String {
    let mut output = String::new();
    for entry in entries {
        if short {
            output.push_str(&format!("{} ", entry.save.archive_path.display()));
        } else {
            output.push_str(&format!(
                "{} {} ",
                entry.id,
                format_timestamp(&entry.save.timestamp)
            ));
        }

        match &entry.checksum {
            Ok(sum) => output.push_str(sum),
            Err(e) => output.push_str(&e.to_string()),
        }
        output.push('\n');
    }
    output
}
