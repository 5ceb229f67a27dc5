use crate::gateway::events::{EventPublisher, MemoryPublisher};
use crate::gateway::GatewayPublisherVia;
use crate::gateway::logs::LogEventPublisher;

pub fn create_publisher(via: GatewayPublisherVia) -> Box<dyn EventPublisher> {
    match via {
        GatewayPublisherVia::Logs => Box::new(LogEventPublisher::new()),
        GatewayPublisherVia::Memory => Box::new(MemoryPublisher::new()),
    }
}
