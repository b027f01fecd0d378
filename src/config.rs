use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::form::field::SelectOption;
use crate::form::project::default_coordinators;

const APP_DIRECTORY: &str = "ticketdesk";
const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_API_URL: &str = "TICKETDESK_API_URL";
pub const ENV_TOKEN: &str = "TICKETDESK_TOKEN";

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIRECTORY))
        .ok_or_else(|| {
            AppError::Configuration("unable to locate a configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinator {
    pub id: String,
    pub name: String,
}

/// What is persisted on disk. Everything is optional so a partial file loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_coordinators: Vec<Coordinator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_on_error: Option<bool>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
    pub project_coordinators: Vec<SelectOption>,
    /// Clear the form after a rejected submission, as the dashboard always did.
    pub reset_on_error: bool,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        let overrides = EnvOverrides {
            api_base_url: env::var(ENV_API_URL).ok(),
            api_token: env::var(ENV_TOKEN).ok(),
        };
        Ok(Self::resolve(stored, overrides))
    }

    pub fn resolve(stored: StoredConfig, overrides: EnvOverrides) -> Self {
        let api_base_url = non_empty(overrides.api_base_url).or(non_empty(stored.api_base_url));
        let api_token = non_empty(overrides.api_token).or(non_empty(stored.api_token));

        let project_coordinators = if stored.project_coordinators.is_empty() {
            default_coordinators()
        } else {
            stored
                .project_coordinators
                .into_iter()
                .map(|coordinator| SelectOption::new(coordinator.id, coordinator.name))
                .collect()
        };

        debug!(
            api_base_url = api_base_url.as_deref().unwrap_or("<unset>"),
            token_present = api_token.is_some(),
            "configuration resolved"
        );

        Self {
            api_base_url,
            api_token,
            project_coordinators,
            reset_on_error: stored.reset_on_error.unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_base_url: Option<String>,
    pub api_token: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
