//! Reminder collection access.
//!
//! Every operation loads the full snapshot, mutates it in memory and replaces
//! the full snapshot once. Callers serialize commands; there is no locking here.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::reminders::Reminder;

pub trait ReminderStore {
    fn load(&self) -> Result<Vec<Reminder>>;
    fn replace(&mut self, items: Vec<Reminder>) -> Result<()>;
}

/// In-memory store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: Vec<Reminder>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Reminder>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Reminder] {
        &self.items
    }
}

impl ReminderStore for MemoryStore {
    fn load(&self) -> Result<Vec<Reminder>> {
        Ok(self.items.clone())
    }

    fn replace(&mut self, items: Vec<Reminder>) -> Result<()> {
        self.items = items;
        Ok(())
    }
}

/// Flip `completed`; returns the new state, or `None` if `id` is unknown.
pub fn toggle_complete(store: &mut dyn ReminderStore, id: i64) -> Result<Option<bool>> {
    let mut all = store.load()?;
    let Some(item) = all.iter_mut().find(|r| r.id == id) else {
        return Ok(None);
    };
    item.completed = !item.completed;
    let state = item.completed;
    store.replace(all)?;
    Ok(Some(state))
}

/// Edit label and/or time in place.
pub fn update_reminder(
    store: &mut dyn ReminderStore,
    id: i64,
    label: Option<&str>,
    time: Option<DateTime<Utc>>,
) -> Result<Option<Reminder>> {
    let mut all = store.load()?;
    let Some(item) = all.iter_mut().find(|r| r.id == id) else {
        return Ok(None);
    };
    if let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) {
        item.label = label.to_string();
    }
    if let Some(time) = time {
        item.time = Some(time);
    }
    let updated = item.clone();
    store.replace(all)?;
    Ok(Some(updated))
}

/// Returns whether anything was removed.
pub fn delete_reminder(store: &mut dyn ReminderStore, id: i64) -> Result<bool> {
    let mut all = store.load()?;
    let before = all.len();
    all.retain(|r| r.id != id);
    if all.len() == before {
        return Ok(false);
    }
    store.replace(all)?;
    Ok(true)
}

/// Drop every reminder; returns how many there were.
pub fn clear_all(store: &mut dyn ReminderStore) -> Result<usize> {
    let count = store.load()?.len();
    store.replace(Vec::new())?;
    Ok(count)
}
