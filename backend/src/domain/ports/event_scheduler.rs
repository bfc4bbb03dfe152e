//! Driving port for the event scheduler.

use async_trait::async_trait;

use crate::domain::{
    AssociationId, DispatchOutcome, Error, Event, EventChanges, EventId, NewEvent,
};

/// Use-cases over scheduled events and their notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventScheduler: Send + Sync {
    /// Persist an event, then notify its association's members.
    async fn create(&self, event: NewEvent) -> Result<Event, Error>;

    /// All events.
    async fn find_all(&self) -> Result<Vec<Event>, Error>;

    /// Events of one association.
    async fn find_for_association(&self, association_id: AssociationId)
    -> Result<Vec<Event>, Error>;

    /// One event; `NotFound` when absent.
    async fn find_one(&self, id: EventId) -> Result<Event, Error>;

    /// Apply a partial edit, re-resolving any supplied association.
    async fn update(&self, id: EventId, changes: EventChanges) -> Result<Event, Error>;

    /// Delete an event; `NotFound` when absent.
    async fn remove(&self, id: EventId) -> Result<Event, Error>;

    /// Send the creation notice for `event`; never fails.
    async fn notify(&self, event: &Event) -> DispatchOutcome;
}
