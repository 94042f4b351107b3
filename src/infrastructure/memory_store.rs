use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::{AppError, AppResult, WatcherRepository};
use crate::domain::{Profile, UserId, Watcher};

/// Process-local watch list. Insertion order is the listing order.
#[derive(Clone, Default)]
pub struct InMemoryWatchRegistry {
    inner: Arc<Mutex<Vec<Watcher>>>,
}

impl InMemoryWatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from configured ids; duplicates collapse onto the first entry.
    pub fn with_ids(ids: impl IntoIterator<Item = UserId>) -> Self {
        let mut watchers: Vec<Watcher> = Vec::new();
        for id in ids {
            if !watchers.iter().any(|w| w.id == id) {
                watchers.push(Watcher::new(id));
            }
        }
        Self {
            inner: Arc::new(Mutex::new(watchers)),
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Vec<Watcher>>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Storage("lock poisoned".into()))
    }
}

impl WatcherRepository for InMemoryWatchRegistry {
    fn add(&self, id: UserId) -> AppResult<(Watcher, bool)> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner.iter().find(|w| w.id == id) {
            return Ok((existing.clone(), false));
        }
        let watcher = Watcher::new(id);
        inner.push(watcher.clone());
        Ok((watcher, true))
    }

    fn remove(&self, id: UserId) -> AppResult<Option<Watcher>> {
        let mut inner = self.lock()?;
        // Vec::remove keeps the order of the remaining entries
        Ok(inner
            .iter()
            .position(|w| w.id == id)
            .map(|idx| inner.remove(idx)))
    }

    fn get(&self, id: UserId) -> AppResult<Option<Watcher>> {
        let inner = self.lock()?;
        Ok(inner.iter().find(|w| w.id == id).cloned())
    }

    fn list(&self) -> AppResult<Vec<Watcher>> {
        let inner = self.lock()?;
        Ok(inner.clone())
    }

    fn apply_profile(&self, profile: &Profile) -> AppResult<bool> {
        let mut inner = self.lock()?;
        match inner.iter_mut().find(|w| w.id == profile.id) {
            Some(w) => {
                w.apply_profile(profile);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(reg: &InMemoryWatchRegistry) -> Vec<u64> {
        reg.list().unwrap().iter().map(|w| w.id.get()).collect()
    }

    #[test]
    fn seeding_drops_duplicates() {
        let reg = InMemoryWatchRegistry::with_ids([3, 1, 3, 2].map(UserId::new));
        assert_eq!(ids(&reg), vec![3, 1, 2]);
    }

    #[test]
    fn profile_for_unknown_id_is_ignored() {
        let reg = InMemoryWatchRegistry::new();
        let applied = reg
            .apply_profile(&Profile::new(UserId::new(5), "ghost"))
            .unwrap();
        assert!(!applied);
        assert!(reg.list().unwrap().is_empty());
    }
}
