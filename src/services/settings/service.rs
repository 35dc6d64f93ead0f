use crate::models::settings::Settings;
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "calendar.db";

/// Reads and writes `Settings` as TOML.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    /// Service for `config.toml` in the project config directory.
    pub fn new() -> Result<Self> {
        let dirs = project_dirs()?;
        Ok(Self::with_path(dirs.config_dir().join(CONFIG_FILE)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings, falling back to defaults when the file is missing.
    pub fn load(&self) -> Result<Settings> {
        Self::load_from(&self.path)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        Self::save_to(&self.path, settings)
    }

    pub fn load_from(path: &Path) -> Result<Settings> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", path.display(), e))?;

        Ok(settings)
    }

    pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    /// Database file to open: the configured path or the project data directory.
    pub fn database_path(settings: &Settings) -> Result<PathBuf> {
        if let Some(path) = &settings.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs()?;
        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory at {}", data_dir.display()))?;
        Ok(data_dir.join(DATABASE_FILE))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "MonthGrid", "MonthGrid")
        .ok_or_else(|| anyhow!("Could not determine project directories"))
}
