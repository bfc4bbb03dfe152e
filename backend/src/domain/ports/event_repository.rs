//! Port for event persistence.

use async_trait::async_trait;

use crate::domain::{AssociationId, Event, EventId, NewEvent};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "event repository connection failed: {message}" as service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "event repository query failed: {message}" as internal,
    }
}

/// Port for scheduled events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Store a new event.
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError>;

    /// Overwrite an existing event; `None` when it does not exist.
    async fn replace(
        &self,
        id: EventId,
        event: &NewEvent,
    ) -> Result<Option<Event>, EventRepositoryError>;

    /// Find an event by id.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// All events ordered by id.
    async fn list(&self) -> Result<Vec<Event>, EventRepositoryError>;

    /// Events of one association ordered by start.
    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Event>, EventRepositoryError>;

    /// Delete an event; returns whether it existed.
    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError>;
}
