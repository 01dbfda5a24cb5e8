//! Game registry
//!
//! The registry is the persisted root of all state: the base directory for
//! archive roots, the ordered list of games and the format version of the
//! file it was loaded from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::file_io::{read_json_optional, write_json_atomic};
use super::migrate::CURRENT_FORMAT_VERSION;
use crate::config::paths::absolutize;
use crate::error::{SaverError, SaverResult};
use crate::models::Game;

/// All tracked games plus where their backups live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Base directory; each game's archive root is `root_directory/name`
    #[serde(rename = "Root")]
    pub root_directory: PathBuf,

    /// Games in the order they were added
    #[serde(rename = "Games", default)]
    pub games: Vec<Game>,

    /// Schema version of the persisted form
    #[serde(rename = "Version", default)]
    pub format_version: u32,
}

impl Registry {
    /// Create an empty registry at the current format version
    pub fn new(root_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root_directory.into(),
            games: Vec::new(),
            format_version: CURRENT_FORMAT_VERSION,
        }
    }

    /// Load a registry from disk, or `None` if the file doesn't exist
    pub fn load(path: &Path) -> SaverResult<Option<Self>> {
        debug!("loading config from {}", path.display());
        let registry: Option<Self> = read_json_optional(path)?;
        if let Some(registry) = &registry {
            registry.check_version();
        }
        Ok(registry)
    }

    /// Persist the registry atomically
    pub fn save(&self, path: &Path) -> SaverResult<()> {
        debug!("saving config to {}", path.display());
        write_json_atomic(path, self)
    }

    /// Whether the registry is at the current format version
    ///
    /// Logs a warning asking for `migrate` when it isn't.
    pub fn check_version(&self) -> bool {
        if self.format_version >= CURRENT_FORMAT_VERSION {
            return true;
        }

        warn!(
            "using old config format, please migrate ({} change(s) behind)",
            CURRENT_FORMAT_VERSION - self.format_version
        );
        false
    }

    /// Number of games
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no games are registered
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Exact-name lookup
    pub fn get_game(&self, name: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.name == name)
    }

    /// Exact-name lookup for mutation
    pub fn game_mut(&mut self, name: &str) -> Option<&mut Game> {
        self.games.iter_mut().find(|g| g.name == name)
    }

    /// Like `game_mut`, but a missing game is an error
    pub fn require_game_mut(&mut self, name: &str) -> SaverResult<&mut Game> {
        self.game_mut(name)
            .ok_or_else(|| SaverError::game_not_found(name))
    }

    /// Register a new game and create its archive root
    ///
    /// `source_path` is made absolute against the current directory. On any
    /// error the registry is left unchanged.
    pub fn add_game(&mut self, name: &str, source_path: impl AsRef<Path>) -> SaverResult<&Game> {
        Game::validate_name(name)?;

        if self.get_game(name).is_some() {
            return Err(SaverError::AlreadyExists {
                entity_type: "Game",
                identifier: name.to_string(),
            });
        }

        let source_path = absolutize(source_path.as_ref())?;
        if !source_path.exists() {
            return Err(SaverError::target_not_found(
                source_path.display().to_string(),
            ));
        }

        let archive_root = self.root_directory.join(name);
        if archive_root.exists() {
            return Err(SaverError::AlreadyExists {
                entity_type: "Backup directory",
                identifier: archive_root.display().to_string(),
            });
        }

        fs::create_dir_all(&archive_root).map_err(|e| {
            SaverError::Io(format!(
                "Failed to create {}: {}",
                archive_root.display(),
                e
            ))
        })?;

        info!("added game {} tracking {}", name, source_path.display());
        self.games.push(Game::new(name, source_path, archive_root));
        Ok(&self.games[self.games.len() - 1])
    }

    /// Remove a game and irreversibly delete all of its artifacts
    pub fn remove_game(&mut self, name: &str) -> SaverResult<Game> {
        let position = self
            .games
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| SaverError::game_not_found(name))?;

        let root = &self.games[position].archive_root;
        debug!("removing all from {}", root.display());
        match fs::remove_dir_all(root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("backup directory {} was already missing", root.display());
            }
            Err(e) => {
                return Err(SaverError::Io(format!(
                    "Failed to remove {}: {}",
                    root.display(),
                    e
                )))
            }
        }

        info!("removed game {}", name);
        Ok(self.games.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Registry) {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::new(temp_dir.path().join("backups"));
        (temp_dir, registry)
    }

    fn live_save(temp_dir: &TempDir, name: &str) -> PathBuf {
        let path = temp_dir.path().join(name);
        fs::write(&path, b"save data").unwrap();
        path
    }

    #[test]
    fn test_add_game() {
        let (temp_dir, mut registry) = setup();
        let source = live_save(&temp_dir, "rpg.sav");

        let game = registry.add_game("rpg", &source).unwrap();

        assert_eq!(game.source_path, source);
        assert_eq!(game.archive_root, temp_dir.path().join("backups").join("rpg"));
        assert!(game.archive_root.is_dir());
        assert!(game.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_duplicate_leaves_registry_unchanged() {
        let (temp_dir, mut registry) = setup();
        let source = live_save(&temp_dir, "rpg.sav");
        registry.add_game("rpg", &source).unwrap();
        let before = registry.clone();

        let err = registry.add_game("rpg", &source).unwrap_err();

        assert!(err.is_already_exists());
        assert_eq!(registry, before);
    }

    #[test]
    fn test_add_missing_source_is_not_found() {
        let (temp_dir, mut registry) = setup();

        let err = registry
            .add_game("rpg", temp_dir.path().join("missing"))
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(registry.is_empty());
        assert!(!temp_dir.path().join("backups").join("rpg").exists());
    }

    #[test]
    fn test_add_with_stale_archive_root_fails() {
        let (temp_dir, mut registry) = setup();
        let source = live_save(&temp_dir, "rpg.sav");
        fs::create_dir_all(temp_dir.path().join("backups").join("rpg")).unwrap();

        let err = registry.add_game("rpg", &source).unwrap_err();

        assert!(err.is_already_exists());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_rejects_path_like_names() {
        let (temp_dir, mut registry) = setup();
        let source = live_save(&temp_dir, "rpg.sav");

        let err = registry.add_game("../escape", &source).unwrap_err();
        assert!(matches!(err, SaverError::Validation(_)));
    }

    #[test]
    fn test_remove_game_keeps_order() {
        let (temp_dir, mut registry) = setup();
        for name in ["a", "b", "c"] {
            let source = live_save(&temp_dir, &format!("{}.sav", name));
            registry.add_game(name, &source).unwrap();
        }
        let root_b = registry.get_game("b").unwrap().archive_root.clone();
        fs::write(root_b.join("artifact"), b"x").unwrap();

        let removed = registry.remove_game("b").unwrap();

        assert_eq!(removed.name, "b");
        assert!(!root_b.exists());
        let names: Vec<_> = registry.games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_unknown_game() {
        let (_temp_dir, mut registry) = setup();
        assert!(registry.remove_game("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_tolerates_missing_archive_root() {
        let (temp_dir, mut registry) = setup();
        let source = live_save(&temp_dir, "rpg.sav");
        let root = registry.add_game("rpg", &source).unwrap().archive_root.clone();
        fs::remove_dir_all(&root).unwrap();

        registry.remove_game("rpg").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_game_is_exact() {
        let (temp_dir, mut registry) = setup();
        let source = live_save(&temp_dir, "rpg.sav");
        registry.add_game("rpg", &source).unwrap();

        assert!(registry.get_game("rpg").is_some());
        assert!(registry.get_game("RPG").is_none());
        assert!(registry.get_game("rp").is_none());
        assert!(registry.require_game_mut("rp").unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_and_load() {
        let (temp_dir, mut registry) = setup();
        let source = live_save(&temp_dir, "rpg.sav");
        registry.add_game("rpg", &source).unwrap();
        let path = temp_dir.path().join("saver.json");

        registry.save(&path).unwrap();
        let loaded = Registry::load(&path).unwrap().unwrap();

        assert_eq!(loaded, registry);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Registry::load(&temp_dir.path().join("saver.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_load_legacy_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("saver.json");
        fs::write(
            &path,
            r#"{"Root":"/games","Games":[{"Name":"rpg","Path":"/live/rpg","Root":"/games/rpg",
                "Stamp":"2019-05-01T10:00:00+02:00",
                "Saves":[{"Stamp":"2019-05-01T10:00:00+02:00","Path":"/games/rpg/x","Note":""}]}]}"#,
        )
        .unwrap();

        let registry = Registry::load(&path).unwrap().unwrap();

        assert_eq!(registry.format_version, 0);
        assert!(!registry.check_version());
        let game = registry.get_game("rpg").unwrap();
        assert_eq!(game.total_size, 0);
        assert_eq!(game.saves[0].size, 0);
    }
}
