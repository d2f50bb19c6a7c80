use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn bonusmodel_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".bonusmodel"))
}

pub fn ensure_bonusmodel_home() -> Result<PathBuf> {
    let dir = bonusmodel_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(bonusmodel_home()?.join("config.toml"))
}
