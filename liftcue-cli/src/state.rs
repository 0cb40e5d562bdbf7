use anyhow::{Context, Result};
use liftcue_core::{Reminder, ReminderStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `$LIFTCUE_HOME`, else `~/.liftcue`.
pub fn liftcue_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("LIFTCUE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".liftcue"))
}

pub fn ensure_liftcue_home() -> Result<PathBuf> {
    let dir = liftcue_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn reminders_path() -> Result<PathBuf> {
    Ok(ensure_liftcue_home()?.join("reminders.json"))
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_liftcue_home()?.join("profile.json"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub notifications_muted: bool,
}

pub fn read_profile_from(path: &Path) -> Result<Profile> {
    if !path.exists() {
        return Ok(Profile::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_profile_to(path: &Path, profile: &Profile) -> Result<()> {
    let json = serde_json::to_string_pretty(profile)?;
    write_replacing(path, &json)
}

pub fn read_profile() -> Result<Profile> {
    read_profile_from(&profile_path()?)
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    write_profile_to(&profile_path()?, profile)
}

/// Write to a sibling temp file, then rename over `path`.
fn write_replacing(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

/// Reminder collection persisted as one JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(reminders_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReminderStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Reminder>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&s).with_context(|| format!("parse {}", self.path.display()))
    }

    fn replace(&mut self, items: Vec<Reminder>) -> Result<()> {
        let json = serde_json::to_string_pretty(&items).context("serialize reminders")?;
        write_replacing(&self.path, &json)
    }
}
