use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::utils::date::serializer;

// DomainEventType defines type of event for domain changes
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum DomainEventType {
    Added,
    Updated,
    Deleted,
}

// DomainEvent records a change to books, members, loans or credentials
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_id: String,
    pub name: String,
    pub group: String,
    pub key: String,
    pub kind: DomainEventType,
    pub json_data: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl DomainEvent {
    pub fn added<T: Serialize>(name: &str, group: &str, key: &str, data: &T) -> serde_json::Result<Self> {
        let json = serde_json::to_string(&data)?;
        Ok(Self::build(name, group, key, DomainEventType::Added, json))
    }

    pub fn updated<T: Serialize>(name: &str, group: &str, key: &str, data: &T) -> serde_json::Result<Self> {
        let json = serde_json::to_string(&data)?;
        Ok(Self::build(name, group, key, DomainEventType::Updated, json))
    }

    pub fn deleted<T: Serialize>(name: &str, group: &str, key: &str, data: &T) -> serde_json::Result<Self> {
        let json = serde_json::to_string(&data)?;
        Ok(Self::build(name, group, key, DomainEventType::Deleted, json))
    }

    fn build(name: &str, group: &str, key: &str, kind: DomainEventType, json: String) -> DomainEvent {
        DomainEvent {
            event_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            group: group.to_string(),
            key: key.to_string(),
            kind,
            json_data: json,
            created_at: Utc::now().naive_utc(),
        }
    }
}
