//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the clap
//! argument parsing with the backup engine and the registry. Handlers print
//! their own output and leave persisting the registry to the caller.

pub mod game;
pub mod progress;
pub mod registry;

pub use game::{handle_game_command, GameCommands};
pub use progress::Spinner;
pub use registry::{handle_add, handle_del, handle_list, handle_migrate};

use crate::error::SaverError;

/// The stderr line for an error that ends a command
pub fn error_message(err: &SaverError) -> String {
    match err {
        SaverError::NotFound {
            entity_type: "Game",
            identifier,
        } => format!("Game \"{}\" not found", identifier),
        SaverError::NoSaves(_) => err.to_string(),
        other => format!("Error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(&SaverError::game_not_found("rpg")),
            "Game \"rpg\" not found"
        );
        assert_eq!(
            error_message(&SaverError::NoSaves("rpg".into())),
            "Game \"rpg\" has no saves backed up"
        );
        assert_eq!(
            error_message(&SaverError::IndexOutOfRange("Index from 0 out of range".into())),
            "Error: Index out of range: Index from 0 out of range"
        );
    }
}
