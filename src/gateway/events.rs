use std::cell::RefCell;
use std::rc::Rc;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryResult;

pub trait EventPublisher {
    fn publish(&self, event: &DomainEvent) -> LibraryResult<()>;
}

// MemoryPublisher collects published events; clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryPublisher {
    events: Rc<RefCell<Vec<DomainEvent>>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.borrow().clone()
    }
}

impl EventPublisher for MemoryPublisher {
    fn publish(&self, event: &DomainEvent) -> LibraryResult<()> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}
