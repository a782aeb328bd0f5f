use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "crm.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://qwipo-server.onrender.com/api".into(),
            page_size: 10,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the config file, then the environment, then `api_url_flag`.
///
/// An explicit `config_path` must exist; the default `crm.toml` is optional.
pub fn load_settings(config_path: Option<&Path>, api_url_flag: Option<&str>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;

    if let Some(v) = api_url_flag {
        settings.api_base_url = v.to_string();
    }

    settings.api_base_url = normalize_api_url(&settings.api_base_url)?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.page_size {
        settings.page_size = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("CRM_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        settings.page_size = v
            .trim()
            .parse()
            .with_context(|| format!("APP__PAGE_SIZE must be a positive integer, got '{v}'"))?;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v.trim().parse().with_context(|| {
            format!("APP__REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{v}'")
        })?;
    }

    if settings.page_size == 0 {
        bail!("page size must be greater than zero");
    }
    Ok(())
}

fn normalize_api_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).with_context(|| format!("invalid api url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("api url must use http or https, got '{}'", parsed.scheme());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
