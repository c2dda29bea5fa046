use crate::models::ConnectionMode;
use crate::utils::error::{LauncherError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Service for managing configuration persistence
pub struct ConfigService {
    config_dir: PathBuf,
}

impl ConfigService {
    /// Create a new config service with default directory
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Self::with_dir(config_dir)
    }

    /// Create a config service with custom directory
    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
            tracing::info!("Created config directory: {:?}", config_dir);

            // Set permissions to 0700 on Unix
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut perms = fs::metadata(&config_dir)?.permissions();
                perms.set_mode(0o700);
                fs::set_permissions(&config_dir, perms)?;
            }
        }

        Ok(Self { config_dir })
    }

    /// Get default config directory
    fn get_config_dir() -> Result<PathBuf> {
        ProjectDirs::from("org", "mosh", "mosh-launcher")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| LauncherError::ConfigError("Failed to get config directory".to_string()))
    }

    /// Get path to app settings file
    fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    /// Path of the secret store file
    pub fn secrets_file(&self) -> PathBuf {
        self.config_dir.join("secrets.toml")
    }

    /// Log file used while a session owns the terminal
    pub fn log_file(&self, settings: &LauncherSettings) -> PathBuf {
        settings
            .log_file
            .clone()
            .unwrap_or_else(|| self.config_dir.join("mosh-launcher.log"))
    }

    /// Load launcher settings
    pub fn load_settings(&self) -> Result<LauncherSettings> {
        let path = self.settings_file();

        if !path.exists() {
            tracing::info!("No settings file found, using defaults");
            return Ok(LauncherSettings::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: LauncherSettings = toml::from_str(&content)
            .map_err(|e| LauncherError::ConfigError(format!("Failed to parse settings: {}", e)))?;

        tracing::info!("Loaded settings: engine={}", settings.engine_path);
        Ok(settings)
    }

    /// Save launcher settings
    pub fn save_settings(&self, settings: &LauncherSettings) -> Result<()> {
        let content = toml::to_string_pretty(settings).map_err(|e| {
            LauncherError::ConfigError(format!("Failed to serialize settings: {}", e))
        })?;

        let path = self.settings_file();
        fs::write(&path, content)?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Launcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherSettings {
    /// Engine executable, either a path or a name looked up on `PATH`
    #[serde(default = "default_engine_path")]
    pub engine_path: String,

    /// Extra arguments for the engine executable
    #[serde(default)]
    pub engine_args: Vec<String>,

    /// Base window title; the target address is appended on connect
    #[serde(default = "default_title")]
    pub title: String,

    /// Mode preselected in the connection form
    #[serde(default)]
    pub default_mode: ConnectionMode,

    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log file override
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_engine_path() -> String {
    "mosh-engine".to_string()
}

fn default_title() -> String {
    "Mosh".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            engine_args: Vec::new(),
            title: default_title(),
            default_mode: ConnectionMode::default(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}
