use std::path::PathBuf;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

pub const CHANNEL_NAME: &str = "Google Garage Digital";
pub const CHANNEL_SOURCE_ID: &str = "sushi-chef-google-digital-literacy";
pub const CHANNEL_DOMAIN: &str = "learndigital.withgoogle.com";
pub const CHANNEL_DESCRIPTION: &str = "";
pub const COPYRIGHT_HOLDER: &str = "Google Garage Digital";

const DEFAULT_BASE_URL: &str = "https://learndigital.withgoogle.com/garagedigital/";
const DEFAULT_LANGUAGE: &str = "es";
const DEFAULT_PAGES_DIR: &str = "pages";
const DEFAULT_DB_PATH: &str = "data/channel.sqlite";

/// Run settings: defaults, then `chef.toml` if present, then `CHEF_*`
/// environment variables. CLI flags are applied on top by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub language: String,
    pub pages_dir: PathBuf,
    pub online: bool,
    pub db_path: PathBuf,
    #[serde(default)]
    pub json_path: Option<PathBuf>,
    /// Session cookie forwarded verbatim by the HTTP fetcher. Only used with `online`.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let raw = Self::defaults()?
            .add_source(File::with_name("chef").required(false))
            .add_source(Environment::with_prefix("CHEF"))
            .build()
            .context("Failed to build settings")?;
        Self::from_config(raw)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("language", DEFAULT_LANGUAGE)?
            .set_default("pages_dir", DEFAULT_PAGES_DIR)?
            .set_default("online", false)?
            .set_default("db_path", DEFAULT_DB_PATH)?)
    }

    fn from_config(raw: Config) -> Result<Self> {
        let mut settings: Settings = raw
            .try_deserialize()
            .context("Failed to deserialize settings")?;
        if !settings.base_url.ends_with('/') {
            settings.base_url.push('/');
        }
        Ok(settings)
    }
}
