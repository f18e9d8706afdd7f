use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::warn;

use famenu_core::clock::SystemClock;
use famenu_core::models::DEFAULT_HOUSEHOLD_ID;
use famenu_core::service::MenuService;
use famenu_core::store::{MemoryStore, SqliteStore};

pub const DB_ENV: &str = "FAMENU_DB";
pub const HOUSEHOLD_ENV: &str = "FAMENU_HOUSEHOLD";

pub struct Config {
    pub db_path: PathBuf,
    pub household_id: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let db_path = match std::env::var_os(DB_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => {
                let proj_dirs = ProjectDirs::from("", "", "famenu")
                    .context("Could not determine home directory")?;
                let data_dir = proj_dirs.data_dir().to_path_buf();
                std::fs::create_dir_all(&data_dir).with_context(|| {
                    format!("Failed to create data directory: {}", data_dir.display())
                })?;
                data_dir.join("famenu.db")
            }
        };

        let household_id = household_from(std::env::var(HOUSEHOLD_ENV).ok());

        Ok(Config {
            db_path,
            household_id,
        })
    }

    /// Open the service on the configured database. An unusable database
    /// file degrades to an in-memory store for this run.
    pub fn open_service(&self) -> MenuService {
        match SqliteStore::open(&self.db_path) {
            Ok(store) => MenuService::open(Box::new(store), Box::new(SystemClock), &self.household_id),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "database unavailable, changes will not be saved");
                MenuService::open(
                    Box::new(MemoryStore::new()),
                    Box::new(SystemClock),
                    &self.household_id,
                )
            }
        }
    }
}

fn household_from(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_HOUSEHOLD_ID.to_string())
}
