use chrono_tz::Tz;
use clap::Parser;
use client::DEFAULT_TOKEN_PATH;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/carbonboard.toml";
const ENV_PREFIX: &str = "CARBONBOARD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Pre-filled on the login screen.
    pub email: String,
    pub timezone: String,
    pub log_level: String,
    pub log_file: String,
    pub token_path: String,
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            email: String::new(),
            timezone: "UTC".to_string(),
            log_level: "info".to_string(),
            log_file: "logs/carbonboard_tui.log".to_string(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            page_size: 10,
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

#[derive(Debug, Parser)]
#[command(name = "carbonboard_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL, API prefix included (e.g. http://127.0.0.1:5000/api).
    #[arg(long)]
    base_url: Option<String>,
    /// Override login email (password is never read from CLI).
    #[arg(long)]
    email: Option<String>,
    /// Override timezone (IANA name) used to pick "today".
    #[arg(long)]
    timezone: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override the persisted session file.
    #[arg(long)]
    token_path: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_from(Args::parse())
}

fn load_from(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(token_path) = args.token_path {
        settings.token_path = token_path;
    }
    if settings.page_size == 0 {
        settings.page_size = AppConfig::default().page_size;
    }

    settings.tz()?;
    Ok(settings)
}
