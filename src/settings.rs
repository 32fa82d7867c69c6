use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::db::{DEFAULT_COLLECTION, DEFAULT_DB_PATH};
use crate::export::DEFAULT_CSV_PATH;
use crate::record::RoleCategory;

const SETTINGS_FILE: &str = "joblens.toml";

/// Run settings: defaults, then `joblens.toml`, then `JOBLENS_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub file_pattern: Option<String>,
    pub role: RoleCategory,
    pub role_code: Option<String>,
    pub db_path: PathBuf,
    pub collection: String,
    pub csv_path: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(file: &Path) -> Result<Self> {
        Config::builder()
            .set_default("input_dir", "ds")?
            .set_default("role", "ds")?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("collection", DEFAULT_COLLECTION)?
            .set_default("csv_path", DEFAULT_CSV_PATH)?
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix("JOBLENS"))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    /// The tag stored with every record: an explicit code wins over the
    /// category's built-in one.
    pub fn role_code(&self) -> String {
        self.role_code
            .clone()
            .unwrap_or_else(|| self.role.code().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(s.input_dir, PathBuf::from("ds"));
        assert_eq!(s.role, RoleCategory::Ds);
        assert_eq!(s.role_code(), "1");
        assert_eq!(s.collection, DEFAULT_COLLECTION);
        assert_eq!(s.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
        assert!(s.file_pattern.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("joblens.toml");
        std::fs::write(
            &path,
            "input_dir = \"pages/ba\"\nrole = \"ba\"\ncollection = \"ba_postings\"\nfile_pattern = '^ba_\\d+\\.html$'\n",
        )
        .unwrap();

        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.input_dir, PathBuf::from("pages/ba"));
        assert_eq!(s.role, RoleCategory::Ba);
        assert_eq!(s.role_code(), "3");
        assert_eq!(s.collection, "ba_postings");
        assert_eq!(s.file_pattern.as_deref(), Some(r"^ba_\d+\.html$"));
    }

    #[test]
    fn explicit_role_code_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("joblens.toml");
        std::fs::write(&path, "role = \"da\"\nrole_code = \"DA-2024\"\n").unwrap();
        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.role, RoleCategory::Da);
        assert_eq!(s.role_code(), "DA-2024");
    }
}
