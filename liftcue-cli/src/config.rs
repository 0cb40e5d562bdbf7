use anyhow::{Context, Result};
use chrono::Duration;
use chrono_tz::Tz;
use liftcue_core::{parse_timezone, InterpreterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_liftcue_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub interpreter: InterpreterSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InterpreterSection {
    /// IANA name; all day boundaries are computed in this zone.
    pub timezone: String,
    /// Same-label reminders closer than this many seconds are duplicates.
    pub dedup_window_secs: i64,
    /// Labels shown by "what do i have today" before eliding.
    pub today_preview_limit: usize,
}

impl Default for InterpreterSection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            dedup_window_secs: 60,
            today_preview_limit: 3,
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.interpreter.timezone)
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            dedup_window: Duration::seconds(self.interpreter.dedup_window_secs.max(0)),
            today_preview_limit: self.interpreter.today_preview_limit,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_liftcue_home()?.join("config.toml"))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
