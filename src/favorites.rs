use std::collections::HashSet;

use tokio::sync::Mutex;

use crate::catalog::Volume;

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Key under which the whole favorites list is persisted.
pub const FAVORITES_KEY: &str = "favorites";

/// Result of trying to add a volume to the favorites list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The volume was appended; carries the full persisted list.
    Added(Vec<Volume>),
    /// A volume with the same id is already present. Nothing was written.
    Duplicate,
}

/// The favorites list, persisted as a whole under [`FAVORITES_KEY`].
///
/// Every mutation is a read-modify-write of the entire list and holds
/// `write_lock` for its duration, so concurrent mutations never lose each
/// other's updates.
pub struct Favorites<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> Favorites<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the persisted list. A missing key is an empty list.
    pub async fn load(&self) -> Result<Vec<Volume>, StoreError> {
        let Some(raw) = self.store.get(FAVORITES_KEY).await? else {
            return Ok(Vec::new());
        };
        let stored: Vec<Volume> = serde_json::from_str(&raw)?;

        let mut seen = HashSet::new();
        let favorites: Vec<Volume> = stored
            .into_iter()
            .filter(|volume| seen.insert(volume.id.clone()))
            .collect();
        log::debug!(target: "favorites", "Loaded {} favorites", favorites.len());

        Ok(favorites)
    }

    /// Appends `volume` unless its id is already stored.
    pub async fn add(&self, volume: Volume) -> Result<AddOutcome, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut favorites = self.load().await?;
        if favorites.iter().any(|fav| fav.id == volume.id) {
            log::info!(target: "favorites", "Volume `{}` is already a favorite", volume.id);
            return Ok(AddOutcome::Duplicate);
        }

        favorites.push(volume);
        self.write(&favorites).await?;

        Ok(AddOutcome::Added(favorites))
    }

    /// Persists `current` without the entry whose id is `id`, returning the
    /// list that was written.
    pub async fn remove(&self, current: &[Volume], id: &str) -> Result<Vec<Volume>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let favorites: Vec<Volume> = current.iter().filter(|fav| fav.id != id).cloned().collect();
        self.write(&favorites).await?;

        Ok(favorites)
    }

    async fn write(&self, favorites: &[Volume]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(favorites)?;
        self.store.set(FAVORITES_KEY, raw).await?;
        log::debug!(target: "favorites", "Persisted {} favorites", favorites.len());
        Ok(())
    }
}
