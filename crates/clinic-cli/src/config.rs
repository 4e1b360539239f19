use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
    pub page_size: Option<u32>,
    pub token: Option<String>,
}

impl ProfileConfig {
    /// Set one key from its textual form, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => self.server = Some(value.to_string()),
            "format" => {
                OutputFormat::from_str(value, true)
                    .map_err(|_| anyhow::anyhow!("Unknown format: {value}. Valid formats: json, table"))?;
                self.format = Some(value.to_ascii_lowercase());
            }
            "page_size" => {
                let size: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid page_size: {value}"))?;
                if size == 0 {
                    anyhow::bail!("page_size must be positive");
                }
                self.page_size = Some(size);
            }
            "token" => self.token = Some(value.to_string()),
            other => {
                anyhow::bail!("Unknown config key: {other}. Valid keys: server, format, page_size, token")
            }
        }
        Ok(())
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
    }
}

pub type ConfigFile = BTreeMap<String, ProfileConfig>;

fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".clinic");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn load_profile_from(path: &Path, profile: &str) -> Result<ProfileConfig> {
    Ok(load_all_from(path)?.remove(profile).unwrap_or_default())
}

pub fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    all.insert(profile.to_string(), config.clone());
    let content = toml::to_string_pretty(&all)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    load_profile_from(&config_path()?, profile)
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path()?, profile, config)
}

pub fn resolve_server(cli_server: &Option<String>, config: &ProfileConfig) -> Result<String> {
    // --server flag / CLINIC_URL env first, then the profile
    if let Some(s) = cli_server {
        return Ok(s.clone());
    }
    if let Some(s) = &config.server {
        return Ok(s.clone());
    }
    anyhow::bail!(
        "No server URL configured. Use --server, set CLINIC_URL env var, or run: clinic config set server <url>"
    )
}
