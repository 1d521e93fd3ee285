//! Photos accepted by earlier posts of an unfinished survey.
//!
//! Browsers cannot put a file back into a file input, so every re-render of
//! the survey would otherwise lose the selection. Accepted photos are parked
//! here under a random draft key that the form posts back.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::domain::survey::PhotoSelection;

/// How long an untouched draft keeps its photos.
pub const DRAFT_TTL: Duration = Duration::from_secs(60 * 60);

/// Drafts kept at once; the oldest is dropped beyond this.
pub const MAX_DRAFTS: usize = 64;

/// Storage for the photo selections of unfinished surveys.
pub trait PhotoStash {
    /// Removes and returns the selection parked under `key`.
    fn take(&self, key: &Uuid) -> Option<PhotoSelection>;

    /// Parks a selection. An empty selection only clears the key.
    fn put(&self, key: Uuid, photos: PhotoSelection);
}

#[derive(Debug)]
pub struct MemoryPhotoStash {
    ttl: Duration,
    capacity: usize,
    drafts: Mutex<HashMap<Uuid, (Instant, PhotoSelection)>>,
}

impl Default for MemoryPhotoStash {
    fn default() -> Self {
        Self::new(DRAFT_TTL, MAX_DRAFTS)
    }
}

impl MemoryPhotoStash {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            drafts: Mutex::new(HashMap::new()),
        }
    }

    fn drafts(&self) -> MutexGuard<'_, HashMap<Uuid, (Instant, PhotoSelection)>> {
        // A panic elsewhere leaves the map itself consistent.
        self.drafts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.drafts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PhotoStash for MemoryPhotoStash {
    fn take(&self, key: &Uuid) -> Option<PhotoSelection> {
        let (stored_at, photos) = self.drafts().remove(key)?;
        (stored_at.elapsed() <= self.ttl).then_some(photos)
    }

    fn put(&self, key: Uuid, photos: PhotoSelection) {
        let mut drafts = self.drafts();
        drafts.remove(&key);
        if photos.is_empty() {
            return;
        }

        let ttl = self.ttl;
        drafts.retain(|_, (stored_at, _)| stored_at.elapsed() <= ttl);
        while drafts.len() >= self.capacity {
            let oldest = drafts
                .iter()
                .min_by_key(|(_, (stored_at, _))| *stored_at)
                .map(|(key, _)| *key);
            match oldest {
                Some(oldest) => {
                    log::warn!("Dropping photos of abandoned survey draft {oldest}");
                    drafts.remove(&oldest);
                }
                None => break,
            }
        }
        drafts.insert(key, (Instant::now(), photos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::PhotoFile;

    fn selection(names: &[&str]) -> PhotoSelection {
        let mut photos = PhotoSelection::default();
        photos
            .accept(
                names
                    .iter()
                    .map(|name| PhotoFile::new(*name, "image/png", vec![1, 2, 3]))
                    .collect(),
            )
            .unwrap();
        photos
    }

    #[test]
    fn take_returns_parked_photos_once() {
        let stash = MemoryPhotoStash::default();
        let key = Uuid::new_v4();
        stash.put(key, selection(&["a.png", "b.png"]));

        let photos = stash.take(&key).unwrap();
        assert_eq!(photos.file_names(), vec!["a.png", "b.png"]);
        assert!(stash.take(&key).is_none());
    }

    #[test]
    fn empty_selection_clears_key() {
        let stash = MemoryPhotoStash::default();
        let key = Uuid::new_v4();
        stash.put(key, selection(&["a.png"]));
        stash.put(key, PhotoSelection::default());

        assert!(stash.is_empty());
        assert!(stash.take(&key).is_none());
    }

    #[test]
    fn expired_drafts_are_not_returned() {
        let stash = MemoryPhotoStash::new(Duration::ZERO, 4);
        let key = Uuid::new_v4();
        stash.put(key, selection(&["a.png"]));
        std::thread::sleep(Duration::from_millis(5));

        assert!(stash.take(&key).is_none());
    }

    #[test]
    fn oldest_draft_is_dropped_at_capacity() {
        let stash = MemoryPhotoStash::new(DRAFT_TTL, 2);
        let (first, second, third) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        stash.put(first, selection(&["1.png"]));
        std::thread::sleep(Duration::from_millis(2));
        stash.put(second, selection(&["2.png"]));
        std::thread::sleep(Duration::from_millis(2));
        stash.put(third, selection(&["3.png"]));

        assert_eq!(stash.len(), 2);
        assert!(stash.take(&first).is_none());
        assert!(stash.take(&second).is_some());
        assert!(stash.take(&third).is_some());
    }
}
