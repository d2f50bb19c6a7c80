use anyhow::{Context, Result};
use bonusmodel_core::{BonusConfig, CalendarSettings};
use bonusmodel_rules::CodeTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_config_path, ensure_bonusmodel_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bonus: BonusConfig,
    #[serde(default)]
    pub codes: CodeTable,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub paths: PathsSection,
}

/// Default input locations, relative to the working directory unless
/// absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_timesheet")]
    pub timesheet: PathBuf,
    /// Directory of `holidays_<year>.json` files.
    #[serde(default = "default_holidays")]
    pub holidays: PathBuf,
    /// Manual classification overrides.
    #[serde(default = "default_mapping")]
    pub mapping: PathBuf,
}

fn default_timesheet() -> PathBuf {
    PathBuf::from("timesheets.json")
}

fn default_holidays() -> PathBuf {
    PathBuf::from("holidays")
}

fn default_mapping() -> PathBuf {
    PathBuf::from("timecode_mapping.json")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            timesheet: default_timesheet(),
            holidays: default_holidays(),
            mapping: default_mapping(),
        }
    }
}

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Read the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    cfg.bonus
        .validate()
        .with_context(|| format!("invalid [bonus] section in {}", path.display()))?;
    cfg.calendar
        .validate()
        .with_context(|| format!("invalid [calendar] section in {}", path.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    if explicit.is_none() {
        ensure_bonusmodel_home()?;
    }
    let p = config_path(explicit)?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
