//! Backup restoration for saver
//!
//! Puts a chosen artifact back over a game's live save location.

use tracing::info;

use super::target::SaveTarget;
use crate::error::{SaverError, SaverResult};
use crate::models::{Game, Save, SaveIndex};

/// Handles restoring a game's saves
pub struct RestoreManager<'a> {
    game: &'a mut Game,
}

/// What a restore put back
#[derive(Debug, Clone)]
pub struct RestoreResult {
    /// 1-based position of the restored save
    pub id: usize,
    pub save: Save,
    pub target: SaveTarget,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored save {} ({}) from {}",
            self.id,
            self.target,
            self.save.archive_path.display()
        )
    }
}

impl<'a> RestoreManager<'a> {
    /// Create a new RestoreManager for a game
    pub fn new(game: &'a mut Game) -> Self {
        Self { game }
    }

    /// Resolve a user-facing index to a zero-based position
    pub fn resolve(&self, index: SaveIndex) -> SaverResult<usize> {
        let len = self.game.saves.len();
        index.resolve(len).ok_or_else(|| {
            if index.0 > 0 {
                SaverError::IndexOutOfRange(format!(
                    "Save ID {} out of range (1 ~ {})",
                    index, len
                ))
            } else {
                SaverError::IndexOutOfRange(format!(
                    "Save offset {} out of range ({} ~ 0)",
                    index,
                    1 - len as i64
                ))
            }
        })
    }

    /// Overwrite the live save with the artifact at `index`
    ///
    /// The live save must exist so its shape can be probed.
    pub fn restore(&mut self, index: SaveIndex) -> SaverResult<RestoreResult> {
        let position = self.resolve(index)?;
        let save = self.game.saves[position].clone();

        let target = SaveTarget::probe(&self.game.source_path)?;
        target.restore(&save.archive_path, &self.game.source_path)?;
        self.game.touch();

        let result = RestoreResult {
            id: position + 1,
            save,
            target,
        };
        info!(game = %self.game.name, "{}", result.summary());
        Ok(result)
    }
}
