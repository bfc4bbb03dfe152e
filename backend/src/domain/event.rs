//! Scheduled association events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AssociationId, EventId};

/// Validation errors raised by event value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// Name was blank.
    #[error("event name must not be empty")]
    EmptyName,
}

/// Display name of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "General assembly")]
pub struct EventName(String);

impl EventName {
    /// Validate an event name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EventValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EventValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Fields required to store an event. `start <= end` is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Display name.
    pub name: EventName,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// Owning association.
    pub association_id: AssociationId,
}

/// Stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: EventId,
    name: EventName,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    association_id: AssociationId,
}

impl Event {
    /// Assemble a stored event.
    #[must_use]
    pub fn from_parts(id: EventId, fields: NewEvent) -> Self {
        let NewEvent {
            name,
            start,
            end,
            association_id,
        } = fields;
        Self {
            id,
            name,
            start,
            end,
            association_id,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &EventName {
        &self.name
    }

    /// Start instant.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End instant.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Owning association.
    #[must_use]
    pub const fn association_id(&self) -> AssociationId {
        self.association_id
    }

    /// Apply a partial edit; the association must already be resolved.
    pub fn apply(&mut self, changes: EventChanges) {
        let EventChanges {
            name,
            start,
            end,
            association_id,
        } = changes;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(start) = start {
            self.start = start;
        }
        if let Some(end) = end {
            self.end = end;
        }
        if let Some(association_id) = association_id {
            self.association_id = association_id;
        }
    }

    /// Stored fields.
    #[must_use]
    pub fn to_fields(&self) -> NewEvent {
        NewEvent {
            name: self.name.clone(),
            start: self.start,
            end: self.end,
            association_id: self.association_id,
        }
    }
}

/// Partial edit of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    /// Replacement name.
    pub name: Option<EventName>,
    /// Replacement start.
    pub start: Option<DateTime<Utc>>,
    /// Replacement end.
    pub end: Option<DateTime<Utc>>,
    /// Move to another association.
    pub association_id: Option<AssociationId>,
}
