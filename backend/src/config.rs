//! Runtime configuration.
//!
//! Paths are derived from a base directory taken from the environment
//! (a `.env` file is honored):
//!
//! | Variable               | Default | Meaning                      |
//! |------------------------|---------|------------------------------|
//! | `LIVRARIA_HOME`        | `.`     | base directory               |
//! | `LIVRARIA_MAX_BACKUPS` | `5`     | backups kept after rotation  |
//!
//! ```text
//! $LIVRARIA_HOME/
//! ├── data/livraria.json
//! ├── backups/backup_livraria_<timestamp>.json
//! └── exports/livros_exportados.csv
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable holding the base directory.
pub const HOME_VAR: &str = "LIVRARIA_HOME";

/// Environment variable holding the number of backups to keep.
pub const MAX_BACKUPS_VAR: &str = "LIVRARIA_MAX_BACKUPS";

const DEFAULT_MAX_BACKUPS: usize = 5;
const STORE_FILE: &str = "livraria.json";
const EXPORT_FILE: &str = "livros_exportados.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_dir: PathBuf,
    pub max_backups: usize,
}

impl Config {
    /// Configuration rooted at `base_dir` with default settings.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }

    /// Read configuration from the environment, loading `.env` if present.
    ///
    /// An unparsable `LIVRARIA_MAX_BACKUPS` falls back to the default.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let base_dir = env::var_os(HOME_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let max_backups = env::var(MAX_BACKUPS_VAR)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_BACKUPS);

        Self { base_dir, max_backups }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Catalog store file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join(STORE_FILE)
    }

    /// Default export target.
    pub fn default_export_path(&self) -> PathBuf {
        self.exports_dir().join(EXPORT_FILE)
    }

    /// Create the data, backup and export directories.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [self.data_dir(), self.backup_dir(), self.exports_dir()] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_derived_paths() {
        let config = Config::new("/srv/livraria");
        assert_eq!(config.store_path(), PathBuf::from("/srv/livraria/data/livraria.json"));
        assert_eq!(
            config.default_export_path(),
            PathBuf::from("/srv/livraria/exports/livros_exportados.csv")
        );
        assert_eq!(config.max_backups, 5);
    }

    #[test]
    fn test_ensure_dirs() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path());
        config.ensure_dirs().unwrap();

        assert!(config.data_dir().is_dir());
        assert!(config.backup_dir().is_dir());
        assert!(config.exports_dir().is_dir());
    }
}
