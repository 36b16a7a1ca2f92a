//! Client-side mirror of the server's visualization catalog.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::warn;

use crate::surface::EntryBinding;

/// Server-assigned identifier of a visualization.
pub type VisId = u64;

/// Key of the spreadsheet a visualization draws its data from.
///
/// This is the `key=` parameter of a Google Spreadsheets URL, carried as
/// an opaque token. Nothing stops two entries from sharing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetRef(String);

impl DatasetRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One catalog entry, assembled from the index maps.
#[derive(Clone)]
pub struct VisEntry {
    /// Server-assigned id.
    pub id: VisId,

    /// Display name. Unique only by convention.
    pub name: String,

    /// Backing spreadsheet key.
    pub dataset: DatasetRef,

    /// Whether anonymous viewers may open this visualization.
    pub is_public: bool,

    /// Listing row currently representing this entry, if one is attached.
    pub binding: Option<Arc<dyn EntryBinding>>,
}

impl fmt::Debug for VisEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("dataset", &self.dataset)
            .field("is_public", &self.is_public)
            .field("bound", &self.binding.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Maps {
    names: IndexMap<VisId, String>,
    datasets: IndexMap<VisId, DatasetRef>,
    visibility: IndexMap<VisId, bool>,
    bindings: AHashMap<VisId, Arc<dyn EntryBinding>>,
}

/// Three parallel maps keyed by [`VisId`]: display name, dataset ref and
/// visibility, plus the listing row attached to each entry.
///
/// All writes go through one lock and touch the maps together, so no
/// caller can observe an id present in one map and missing from another.
/// Iteration order is insertion order, which matches the listing.
pub struct EntryIndex {
    maps: RwLock<Maps>,
}

impl EntryIndex {
    pub fn new() -> Self {
        Self {
            maps: RwLock::new(Maps::default()),
        }
    }

    /// Insert or overwrite an entry in all three maps.
    pub fn register(&self, id: VisId, name: &str, dataset: DatasetRef, is_public: bool) {
        let mut maps = self.maps.write();
        maps.names.insert(id, name.to_owned());
        maps.datasets.insert(id, dataset);
        maps.visibility.insert(id, is_public);
    }

    /// Rename a known entry and update its listing row label.
    ///
    /// Unknown ids are ignored so a stray rename can never leave an id
    /// registered in one map only.
    pub fn rename(&self, id: VisId, name: &str) -> bool {
        let mut maps = self.maps.write();
        if !maps.names.contains_key(&id) {
            warn!(id, name, "rename of unknown entry ignored");
            return false;
        }
        maps.names.insert(id, name.to_owned());
        let binding = maps.bindings.get(&id).cloned();
        drop(maps);

        if let Some(binding) = binding {
            binding.set_label(name);
        }
        true
    }

    /// Point a known entry at a different dataset.
    pub fn set_dataset(&self, id: VisId, dataset: DatasetRef) -> bool {
        let mut maps = self.maps.write();
        match maps.datasets.get_mut(&id) {
            Some(slot) => {
                *slot = dataset;
                true
            }
            None => false,
        }
    }

    /// Flip the published flag of a known entry.
    pub fn set_visibility(&self, id: VisId, is_public: bool) -> bool {
        let mut maps = self.maps.write();
        match maps.visibility.get_mut(&id) {
            Some(slot) => {
                *slot = is_public;
                true
            }
            None => false,
        }
    }

    /// Attach the listing row representing this entry.
    pub fn bind(&self, id: VisId, binding: Arc<dyn EntryBinding>) {
        self.maps.write().bindings.insert(id, binding);
    }

    /// Listing row attached to this entry, if any.
    pub fn binding_of(&self, id: VisId) -> Option<Arc<dyn EntryBinding>> {
        self.maps.read().bindings.get(&id).cloned()
    }

    /// Assemble the full view of one entry.
    pub fn lookup(&self, id: VisId) -> Option<VisEntry> {
        let maps = self.maps.read();
        let name = maps.names.get(&id)?;
        Some(VisEntry {
            id,
            name: name.clone(),
            dataset: maps.datasets.get(&id)?.clone(),
            is_public: *maps.visibility.get(&id)?,
            binding: maps.bindings.get(&id).cloned(),
        })
    }

    pub fn name_of(&self, id: VisId) -> Option<String> {
        self.maps.read().names.get(&id).cloned()
    }

    pub fn dataset_of(&self, id: VisId) -> Option<DatasetRef> {
        self.maps.read().datasets.get(&id).cloned()
    }

    /// Remove an entry from every map, handing back its listing row so the
    /// caller can detach it.
    pub fn remove(&self, id: VisId) -> Option<Arc<dyn EntryBinding>> {
        let mut maps = self.maps.write();
        maps.names.shift_remove(&id);
        maps.datasets.shift_remove(&id);
        maps.visibility.shift_remove(&id);
        maps.bindings.remove(&id)
    }

    pub fn contains(&self, id: VisId) -> bool {
        self.maps.read().names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.maps.read().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.read().names.is_empty()
    }

    /// Ids in listing order.
    pub fn ids(&self) -> Vec<VisId> {
        self.maps.read().names.keys().copied().collect()
    }

    /// All entries in listing order.
    pub fn entries(&self) -> Vec<VisEntry> {
        let ids = self.ids();
        ids.into_iter().filter_map(|id| self.lookup(id)).collect()
    }

    /// Whether the three maps cover exactly the same ids.
    ///
    /// Holds after every operation; exposed for diagnostics.
    pub fn coherent(&self) -> bool {
        let maps = self.maps.read();
        maps.names.len() == maps.datasets.len()
            && maps.names.len() == maps.visibility.len()
            && maps
                .names
                .keys()
                .all(|id| maps.datasets.contains_key(id) && maps.visibility.contains_key(id))
    }
}

impl Default for EntryIndex {
    fn default() -> Self {
        Self::new()
    }
}
