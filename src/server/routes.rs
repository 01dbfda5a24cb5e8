//! Request routing for the control surface
//!
//! Transport-free: takes a method and request target, returns a response.
//! Mutating routes persist the registry before answering.

use serde::Serialize;
use tracing::warn;

use super::microserver::HttpResponse;
use crate::backup::{BackupManager, RestoreManager};
use crate::error::{SaverError, SaverResult};
use crate::models::{SaveIndex, SaveRange};
use crate::storage::Storage;

/// Body of a delete response
#[derive(Debug, Serialize)]
struct DeleteResponse {
    deleted: usize,
    error: Option<String>,
}

/// HTTP status for an engine or registry error
pub fn status_for(err: &SaverError) -> u16 {
    match err {
        SaverError::NotFound { .. } => 404,
        SaverError::IndexOutOfRange(_) | SaverError::Validation(_) | SaverError::NoSaves(_) => 400,
        SaverError::AlreadyExists { .. } => 409,
        _ => 500,
    }
}

fn error_response(err: &SaverError) -> HttpResponse {
    HttpResponse::error(status_for(err), &err.to_string())
}

/// Dispatch one request against the registry
pub fn route(storage: &mut Storage, method: &str, target: &str) -> HttpResponse {
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };

    let segments = match decode_segments(path) {
        Some(segments) => segments,
        None => return HttpResponse::error(400, "Malformed path"),
    };
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    let mutating = match segments.as_slice() {
        [_] => false,
        [_, "backup"] | [_, "restore", _] | [_, "delete", _] => true,
        _ => return HttpResponse::error(404, "Not found"),
    };

    let allowed = method == "GET" || (mutating && method == "POST");
    if !allowed {
        return HttpResponse::error(405, "Method not allowed");
    }

    let result = match segments.as_slice() {
        ["list"] => Ok(HttpResponse::json(200, storage.registry())),
        [game] => storage
            .registry()
            .get_game(game)
            .map(|g| HttpResponse::json(200, g))
            .ok_or_else(|| SaverError::game_not_found(*game)),
        [game, "backup"] => backup(storage, game, query_param(query, "note").as_deref()),
        [game, "restore", index] => restore(storage, game, index),
        [game, "delete", range] => delete(storage, game, range),
        _ => Err(SaverError::Server("Unroutable request".into())),
    };

    result.unwrap_or_else(|e| error_response(&e))
}

fn backup(storage: &mut Storage, name: &str, note: Option<&str>) -> SaverResult<HttpResponse> {
    let game = storage.registry_mut().require_game_mut(name)?;
    let save = BackupManager::new(game).backup(note.filter(|n| !n.is_empty()))?;
    persist(storage)?;
    Ok(HttpResponse::json(200, &save))
}

fn restore(storage: &mut Storage, name: &str, index: &str) -> SaverResult<HttpResponse> {
    let index: SaveIndex = index.parse()?;
    let game = storage.registry_mut().require_game_mut(name)?;
    let restored = RestoreManager::new(game).restore(index)?;
    persist(storage)?;
    Ok(HttpResponse::json(200, &restored.save))
}

fn delete(storage: &mut Storage, name: &str, range: &str) -> SaverResult<HttpResponse> {
    let range: SaveRange = range.parse()?;
    let game = storage.registry_mut().require_game_mut(name)?;
    let report = BackupManager::new(game).delete(range)?;
    persist(storage)?;

    if let Some(e) = &report.failure {
        warn!("delete on {} stopped early: {}", name, e);
    }
    Ok(HttpResponse::json(
        200,
        &DeleteResponse {
            deleted: report.count(),
            error: report.failure.as_ref().map(ToString::to_string),
        },
    ))
}

/// The server has no end-of-command point, so every mutation is written out
fn persist(storage: &mut Storage) -> SaverResult<()> {
    storage.mark_dirty();
    storage.save_if_dirty().map(|_| ())
}

/// Split a path into percent-decoded segments, ignoring empty ones
fn decode_segments(path: &str) -> Option<Vec<String>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).ok().map(|c| c.into_owned()))
        .collect()
}

/// First value of a query parameter, form-decoded
fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| {
            urlencoding::decode(&v.replace('+', " "))
                .ok()
                .map(|c| c.into_owned())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaverPaths;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("live.sav");
        fs::write(&source, b"level 1").unwrap();

        let paths = SaverPaths::new(temp_dir.path().join("saver.json")).unwrap();
        let mut storage = Storage::open(paths).unwrap();
        storage.registry_mut().add_game("rpg", &source).unwrap();
        storage.mark_dirty();
        storage.save_if_dirty().unwrap();
        (temp_dir, storage)
    }

    fn body(response: &HttpResponse) -> Value {
        serde_json::from_slice(&response.body).unwrap()
    }

    #[test]
    fn test_list_returns_registry() {
        let (_temp_dir, mut storage) = setup();

        let response = route(&mut storage, "GET", "/list");

        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["Games"][0]["Name"], "rpg");
    }

    #[test]
    fn test_get_game() {
        let (_temp_dir, mut storage) = setup();

        assert_eq!(route(&mut storage, "GET", "/rpg").status, 200);
        assert_eq!(route(&mut storage, "GET", "/nope").status, 404);
    }

    #[test]
    fn test_backup_with_note_is_persisted() {
        let (temp_dir, mut storage) = setup();

        let response = route(&mut storage, "POST", "/rpg/backup?note=boss+fight%21");

        assert_eq!(response.status, 200);
        assert_eq!(body(&response)["Note"], "boss fight!");

        let saved = fs::read_to_string(temp_dir.path().join("saver.json")).unwrap();
        assert!(saved.contains("boss fight!"));
    }

    #[test]
    fn test_restore_extreme_offset_without_saves() {
        let (_temp_dir, mut storage) = setup();

        let response = route(&mut storage, "GET", "/rpg/restore/-9223372036854775808");

        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_restore_and_bad_index() {
        let (temp_dir, mut storage) = setup();
        route(&mut storage, "GET", "/rpg/backup");
        fs::write(temp_dir.path().join("live.sav"), b"level 2").unwrap();

        assert_eq!(route(&mut storage, "GET", "/rpg/restore/0").status, 200);
        assert_eq!(fs::read(temp_dir.path().join("live.sav")).unwrap(), b"level 1");

        assert_eq!(route(&mut storage, "GET", "/rpg/restore/5").status, 400);
        assert_eq!(route(&mut storage, "GET", "/rpg/restore/x").status, 400);
    }

    #[test]
    fn test_delete_reports_count() {
        let (_temp_dir, mut storage) = setup();
        route(&mut storage, "GET", "/rpg/backup");
        route(&mut storage, "GET", "/rpg/backup");

        let response = route(&mut storage, "POST", "/rpg/delete/1-2");

        assert_eq!(response.status, 200);
        let json = body(&response);
        assert_eq!(json["deleted"], 2);
        assert!(json["error"].is_null());
        assert!(storage.registry().get_game("rpg").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_route_and_method() {
        let (_temp_dir, mut storage) = setup();

        assert_eq!(route(&mut storage, "GET", "/rpg/frobnicate").status, 404);
        assert_eq!(route(&mut storage, "POST", "/list").status, 405);
        assert_eq!(route(&mut storage, "DELETE", "/rpg/backup").status, 405);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&SaverError::game_not_found("x")), 404);
        assert_eq!(status_for(&SaverError::IndexOutOfRange("x".into())), 400);
        assert_eq!(
            status_for(&SaverError::AlreadyExists {
                entity_type: "Game",
                identifier: "x".into()
            }),
            409
        );
        assert_eq!(status_for(&SaverError::Io("x".into())), 500);
    }

    #[test]
    fn test_query_param() {
        assert_eq!(query_param("note=a%20b&x=1", "note").as_deref(), Some("a b"));
        assert_eq!(query_param("x=1", "note"), None);
        assert_eq!(query_param("", "note"), None);
    }
}
