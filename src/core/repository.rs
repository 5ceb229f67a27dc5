use std::cell::RefCell;
use std::rc::Rc;
use serde::{Deserialize, Serialize};
use crate::core::library::LibraryResult;
use crate::gateway::GatewayPublisherVia;

// Repository persists a whole dataset at a time: every save overwrites what was stored before.
pub trait Repository<Entity> {
    // load every stored entity, an absent dataset loads as empty
    fn load_all(&self) -> LibraryResult<Vec<Entity>>;

    // replace the stored dataset with the given entities
    fn save_all(&self, entities: &[&Entity]) -> LibraryResult<usize>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    Csv,
    InMemory,
}

impl RepositoryStore {
    pub fn gateway_publisher(&self) -> GatewayPublisherVia {
        match self {
            RepositoryStore::Csv => GatewayPublisherVia::Logs,
            RepositoryStore::InMemory => GatewayPublisherVia::Memory,
        }
    }
}

// MemoryRepository keeps the last saved snapshot in process memory; clones share the snapshot.
#[derive(Debug, Clone)]
pub struct MemoryRepository<Entity: Clone> {
    records: Rc<RefCell<Vec<Entity>>>,
}

impl<Entity: Clone> MemoryRepository<Entity> {
    pub fn new(records: Vec<Entity>) -> Self {
        Self {
            records: Rc::new(RefCell::new(records)),
        }
    }
}

impl<Entity: Clone> Repository<Entity> for MemoryRepository<Entity> {
    fn load_all(&self) -> LibraryResult<Vec<Entity>> {
        Ok(self.records.borrow().clone())
    }

    fn save_all(&self, entities: &[&Entity]) -> LibraryResult<usize> {
        let mut records = self.records.borrow_mut();
        *records = entities.iter().map(|e| (*e).clone()).collect();
        Ok(records.len())
    }
}
