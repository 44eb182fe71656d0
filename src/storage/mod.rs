use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::settings::Settings;

const DATA_DIR: &str = ".scim2-console";
const SETTINGS_FILE: &str = "settings.json";
const HISTORY_DB: &str = "history.db";

pub fn data_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DATA_DIR)
}

pub fn history_db_path(dir: &Path) -> Result<PathBuf, StorageError> {
    ensure_dir(dir)?;
    Ok(dir.join(HISTORY_DB))
}

pub fn load_settings(dir: &Path) -> Result<Settings, StorageError> {
    let file = dir.join(SETTINGS_FILE);
    if !file.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(&file).map_err(|source| StorageError::Io {
        path: file.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StorageError::Json {
        path: file.display().to_string(),
        source,
    })
}

pub fn save_settings(dir: &Path, settings: &Settings) -> Result<(), StorageError> {
    ensure_dir(dir)?;
    let file = dir.join(SETTINGS_FILE);
    let raw = serde_json::to_string_pretty(settings).map_err(|source| StorageError::Json {
        path: file.display().to_string(),
        source,
    })?;
    fs::write(&file, raw).map_err(|source| StorageError::Io {
        path: file.display().to_string(),
        source,
    })
}

fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| StorageError::Io {
        path: dir.display().to_string(),
        source,
    })
}
