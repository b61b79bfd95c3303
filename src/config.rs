use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InsuranceConfig {
    /// Database file location
    pub database: Option<String>,
    /// Log every SQL statement at debug level
    #[serde(default)]
    pub echo: bool,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("insurance.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("insurance.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<InsuranceConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: InsuranceConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &InsuranceConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Explicit path (flag or `INSURANCE_DB`) wins, then the config file, then the default
pub fn resolve_database_path(explicit: Option<&Path>, config: Option<&InsuranceConfig>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    config
        .and_then(|c| c.database.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
