use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{ResultStore, StoreError};
use crate::ticket::Ticket;

/// In-memory result store guarded by a read-many/write-one lock.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    values: RwLock<HashMap<Ticket, String>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryResultStore {
    fn put(&self, ticket: Ticket, value: String) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        match values.entry(ticket) {
            Entry::Occupied(_) => Err(StoreError::AlreadyPresent(ticket)),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    fn get(&self, ticket: Ticket) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ticket)
            .cloned()
    }

    fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
