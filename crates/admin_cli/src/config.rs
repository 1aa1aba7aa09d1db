use chrono_tz::Tz;
use client::DEFAULT_TOKEN_PATH;
use serde::Deserialize;

use crate::{
    cli::GlobalArgs,
    error::{AdminError, Result},
};

const DEFAULT_CONFIG_PATH: &str = "config/carbonboard.toml";
const ENV_PREFIX: &str = "CARBONBOARD";

/// Shares `config/carbonboard.toml` and the session file with the TUI.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub base_url: String,
    pub email: String,
    pub timezone: String,
    pub log_level: String,
    pub token_path: String,
    pub page_size: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            email: String::new(),
            timezone: "UTC".to_string(),
            log_level: "info".to_string(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            page_size: 10,
        }
    }
}

impl AdminConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AdminError::Timezone(self.timezone.clone()))
    }
}

pub fn load(args: &GlobalArgs) -> Result<AdminConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AdminConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url.clone_from(base_url);
    }
    if let Some(timezone) = &args.timezone {
        settings.timezone.clone_from(timezone);
    }
    if let Some(log_level) = &args.log_level {
        settings.log_level.clone_from(log_level);
    }
    if let Some(token_path) = &args.token_path {
        settings.token_path.clone_from(token_path);
    }
    if settings.page_size == 0 {
        settings.page_size = AdminConfig::default().page_size;
    }

    settings.tz()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GlobalArgs {
        GlobalArgs {
            config: Some("does/not/exist".to_string()),
            ..GlobalArgs::default()
        }
    }

    #[test]
    fn flags_override_defaults() {
        let config = load(&GlobalArgs {
            base_url: Some("http://api.test/api".to_string()),
            token_path: Some("/tmp/session.json".to_string()),
            ..args()
        })
        .unwrap();
        assert_eq!(config.base_url, "http://api.test/api");
        assert_eq!(config.token_path, "/tmp/session.json");
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = load(&GlobalArgs {
            timezone: Some("Mars/Olympus".to_string()),
            ..args()
        })
        .unwrap_err();
        assert!(matches!(err, AdminError::Timezone(tz) if tz == "Mars/Olympus"));
    }
}
