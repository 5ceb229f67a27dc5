use tracing::info;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryResult;
use crate::gateway::events::EventPublisher;

// LogEventPublisher writes each domain event to the log stream as one structured line.
#[derive(Debug, Default)]
pub struct LogEventPublisher;

impl LogEventPublisher {
    pub fn new() -> Self {
        LogEventPublisher
    }
}

impl EventPublisher for LogEventPublisher {
    fn publish(&self, event: &DomainEvent) -> LibraryResult<()> {
        let json = serde_json::to_string(event)?;
        info!(event_id = %event.event_id, name = %event.name, kind = ?event.kind, "{}", json);
        Ok(())
    }
}
