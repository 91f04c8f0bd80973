//! Timestamped copies of the catalog file with rotation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::StoreResult;
use crate::logs::log_warning;

/// File name prefix of every backup.
pub const BACKUP_PREFIX: &str = "backup_livraria_";

/// Copy `store_path` into `backup_dir` and keep only the newest
/// `max_backups` copies.
///
/// A missing store file is created empty first so there is always something
/// to copy. Returns the path of the new backup.
pub fn backup(store_path: &Path, backup_dir: &Path, max_backups: usize) -> StoreResult<PathBuf> {
    fs::create_dir_all(backup_dir)?;
    if !store_path.exists() {
        if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(store_path, "")?;
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S").to_string();
    let extension = store_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("json");
    let target = free_backup_path(backup_dir, &timestamp, extension);

    fs::copy(store_path, &target)?;
    clean_old_backups(backup_dir, max_backups)?;
    Ok(target)
}

/// First unused name for `timestamp`. Backups taken within the same second
/// get a `_1`, `_2`, ... suffix, which also sorts after the plain name.
fn free_backup_path(backup_dir: &Path, timestamp: &str, extension: &str) -> PathBuf {
    let mut target = backup_dir.join(format!("{}{}.{}", BACKUP_PREFIX, timestamp, extension));
    let mut counter = 1;
    while target.exists() {
        target = backup_dir.join(format!("{}{}_{}.{}", BACKUP_PREFIX, timestamp, counter, extension));
        counter += 1;
    }
    target
}

/// Backups in `backup_dir`, newest first.
pub fn list_backups(backup_dir: &Path) -> StoreResult<Vec<PathBuf>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(backup_dir)?.flatten() {
        let path = entry.path();
        let is_backup = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(BACKUP_PREFIX));
        if !is_backup {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        backups.push((modified, path));
    }

    // Names embed the timestamp, so they break mtime ties.
    backups.sort_by(|a, b| b.cmp(a));
    Ok(backups.into_iter().map(|(_, path)| path).collect())
}

/// Delete all but the newest `keep` backups. Returns the removed paths.
///
/// A backup that cannot be deleted is logged and skipped.
pub fn clean_old_backups(backup_dir: &Path, keep: usize) -> StoreResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for old in list_backups(backup_dir)?.into_iter().skip(keep) {
        match fs::remove_file(&old) {
            Ok(()) => removed.push(old),
            Err(e) => log_warning(format!("Não foi possível remover backup '{}': {}", old.display(), e)),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_backup_copies_store() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("data").join("livraria.json");
        fs::create_dir_all(store.parent().unwrap()).unwrap();
        fs::write(&store, "{\"next_id\":1,\"books\":[]}").unwrap();

        let target = backup(&store, &dir.path().join("backups"), 5).unwrap();
        let name = target.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(BACKUP_PREFIX));
        assert!(name.ends_with(".json"));
        assert_eq!(fs::read_to_string(target).unwrap(), "{\"next_id\":1,\"books\":[]}");
    }

    #[test]
    fn test_backup_creates_missing_store() {
        let dir = tempdir().unwrap();
        let store = dir.path().join("data").join("livraria.json");

        let target = backup(&store, &dir.path().join("backups"), 5).unwrap();
        assert!(store.exists());
        assert!(target.exists());
    }

    #[test]
    fn test_same_second_backups_kept_apart() {
        let dir = tempdir().unwrap();
        let backups = dir.path().join("backups");
        let store = dir.path().join("livraria.json");

        fs::write(&store, "primeiro").unwrap();
        let first = backup(&store, &backups, 5).unwrap();
        fs::write(&store, "segundo").unwrap();
        let second = backup(&store, &backups, 5).unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap(), "primeiro");
        assert_eq!(fs::read_to_string(second).unwrap(), "segundo");
    }

    #[test]
    fn test_suffix_used_on_collision() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(format!("{}2024-01-01_120000.json", BACKUP_PREFIX)), "").unwrap();

        let target = free_backup_path(dir.path(), "2024-01-01_120000", "json");
        assert_eq!(
            target.file_name().unwrap().to_str().unwrap(),
            format!("{}2024-01-01_120000_1.json", BACKUP_PREFIX)
        );
    }

    #[test]
    fn test_rotation_keeps_newest() {
        let dir = tempdir().unwrap();
        for day in 1..=7 {
            let name = format!("{}2024-01-0{}_120000.json", BACKUP_PREFIX, day);
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let removed = clean_old_backups(dir.path(), 5).unwrap();
        assert_eq!(removed.len(), 2);

        let kept = list_backups(dir.path()).unwrap();
        assert_eq!(kept.len(), 5);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(list_backups(&dir.path().join("nope")).unwrap().is_empty());
    }
}
