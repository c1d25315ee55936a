use crate::rows::{ItemRow, PackRow};
use crate::{ContentStore, StoreError};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Mutex, MutexGuard};

/// A query issued against a [`MemoryStore`], in the order received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    ListPacks,
    ListItems(String),
    OpenAsset(String, String),
}

#[derive(Default)]
struct State {
    packs: Vec<PackRow>,
    items: HashMap<String, Vec<ItemRow>>,
    assets: HashMap<(String, String), Vec<u8>>,
    queries: Vec<Query>,
    unavailable: bool,
}

/// In-memory content store that records every query it answers.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves only test data behind.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn add_pack(&self, row: PackRow) {
        self.state().packs.push(row);
    }

    /// Add an item row and its payload.
    pub fn add_item(&self, identifier: &str, row: ItemRow, payload: &[u8]) {
        let mut state = self.state();
        state.assets.insert(
            (identifier.to_owned(), row.file_name.clone()),
            payload.to_vec(),
        );
        state
            .items
            .entry(identifier.to_owned())
            .or_default()
            .push(row);
    }

    /// Add an item row whose payload cannot be found.
    pub fn add_item_without_asset(&self, identifier: &str, row: ItemRow) {
        self.state()
            .items
            .entry(identifier.to_owned())
            .or_default()
            .push(row);
    }

    /// Make every query fail as if the store could not be reached.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    pub fn queries(&self) -> Vec<Query> {
        self.state().queries.clone()
    }

    fn record(&self, query: Query) -> Result<MutexGuard<'_, State>, StoreError> {
        let mut state = self.state();
        state.queries.push(query);
        if state.unavailable {
            return Err(StoreError::Unavailable("memory store offline".to_owned()));
        }
        Ok(state)
    }
}

impl ContentStore for MemoryStore {
    fn list_packs(&self) -> Result<Vec<PackRow>, StoreError> {
        Ok(self.record(Query::ListPacks)?.packs.clone())
    }

    fn list_items(&self, identifier: &str) -> Result<Vec<ItemRow>, StoreError> {
        let state = self.record(Query::ListItems(identifier.to_owned()))?;
        Ok(state.items.get(identifier).cloned().unwrap_or_default())
    }

    fn open_asset(
        &self,
        identifier: &str,
        file_name: &str,
    ) -> Result<Box<dyn Read + '_>, StoreError> {
        let state = self.record(Query::OpenAsset(
            identifier.to_owned(),
            file_name.to_owned(),
        ))?;
        let data = state
            .assets
            .get(&(identifier.to_owned(), file_name.to_owned()))
            .cloned()
            .ok_or_else(|| StoreError::AssetNotFound {
                pack: identifier.to_owned(),
                item: file_name.to_owned(),
            })?;
        Ok(Box::new(Cursor::new(data)))
    }
}
