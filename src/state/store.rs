use chrono::{SubsecRound, Utc};
use thiserror::Error;

use super::data::{Item, NewItem};
use super::seed::seed_items;
use super::storage::{SlotStorage, StorageError};

/// Errors returned by the item store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to serialize items: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How the collection was obtained when the store was opened
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The slot was empty and has been filled with the seed set
    Seeded,
    /// The slot held a readable collection
    Restored { count: usize },
    /// The slot was unreadable and has been overwritten with the seed set
    Reset { reason: String },
}

/// Notifications delivered to store listeners
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// An item was prepended and the slot rewritten
    Appended { id: String },
}

/// Handle returned by [`ItemStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// The ItemStore owns the catalog collection.
/// It keeps the items in memory and mirrors the whole list to a single
/// storage slot after every change.
pub struct ItemStore {
    storage: Box<dyn SlotStorage>,
    items: Vec<Item>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl ItemStore {
    /// Key of the slot holding the serialized collection
    pub const SLOT_KEY: &'static str = "item-showcase-items";

    /// Load the collection from `storage`.
    ///
    /// An empty or blank slot is filled with the seed set. A slot that fails to parse
    /// is replaced by the seed set and reported as [`LoadOutcome::Reset`];
    /// only storage failures are returned as errors.
    pub fn open(storage: impl SlotStorage + 'static) -> Result<(Self, LoadOutcome), StoreError> {
        let mut store = ItemStore {
            storage: Box::new(storage),
            items: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
        };

        // A blank slot counts as never written
        let stored = store
            .storage
            .get(Self::SLOT_KEY)?
            .filter(|raw| !raw.trim().is_empty());

        let outcome = match stored {
            None => {
                store.reset_to_seed()?;
                tracing::info!("item slot empty, seeded {} demonstration items", store.items.len());
                LoadOutcome::Seeded
            }
            Some(raw) => match serde_json::from_str::<Vec<Item>>(&raw) {
                Ok(items) => {
                    let count = items.len();
                    store.items = items;
                    tracing::info!(count, "restored items from slot");
                    LoadOutcome::Restored { count }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stored items are unreadable, restoring defaults");
                    store.reset_to_seed()?;
                    LoadOutcome::Reset { reason: e.to_string() }
                }
            },
        };

        Ok((store, outcome))
    }

    fn reset_to_seed(&mut self) -> Result<(), StoreError> {
        let seed = seed_items();
        self.persist(&seed)?;
        self.items = seed;
        Ok(())
    }

    /// All items, newest first
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items in the collection
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Find an item by id
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Add a new item to the front of the collection and persist it.
    ///
    /// The slot is rewritten before the in-memory list changes, so a failed
    /// write leaves the store exactly as it was and notifies nobody.
    pub fn append(&mut self, new_item: NewItem) -> Result<Item, StoreError> {
        // The slot keeps milliseconds, so the in-memory copy does too
        let created_at = Utc::now().trunc_subsecs(3);
        let item = new_item.into_item(self.next_id(), created_at);

        let mut updated = Vec::with_capacity(self.items.len() + 1);
        updated.push(item.clone());
        updated.extend(self.items.iter().cloned());

        self.persist(&updated)?;
        self.items = updated;

        tracing::info!(id = %item.id, name = %item.name, "item added");

        self.notify(&StoreEvent::Appended { id: item.id.clone() });

        Ok(item)
    }

    /// Register a callback invoked after every successful change
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    /// Ids are the creation time in milliseconds, bumped until unused
    fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        loop {
            let id = candidate.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            candidate += 1;
        }
    }

    /// Rewrite the whole collection to the slot
    fn persist(&mut self, items: &[Item]) -> Result<(), StoreError> {
        let json = serde_json::to_string(items)?;
        self.storage.set(Self::SLOT_KEY, &json)?;
        Ok(())
    }
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore")
            .field("items", &self.items.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
