//! Event scheduler domain service.
//!
//! Creating an event persists it and then publishes an `event_created`
//! notice to every current member of the owning association. Notification
//! failures are logged and never undo the write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    AssociationRepository, EventRepository, EventScheduler, NotificationPublisher,
};
use crate::domain::{
    AssociationId, DispatchOutcome, Error, Event, EventChanges, EventId, EventNotification,
    NewEvent, Notification,
};

/// Event scheduler backed by event and association repositories.
#[derive(Clone)]
pub struct EventSchedulerService {
    events: Arc<dyn EventRepository>,
    associations: Arc<dyn AssociationRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl EventSchedulerService {
    /// Create a service over the given repositories and transport.
    pub fn new(
        events: Arc<dyn EventRepository>,
        associations: Arc<dyn AssociationRepository>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            events,
            associations,
            publisher,
        }
    }

    async fn require(&self, id: EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("event {id} not found")))
    }

    async fn require_association(&self, id: AssociationId) -> Result<(), Error> {
        match self.associations.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("association {id} not found"))),
        }
    }
}

#[async_trait]
impl EventScheduler for EventSchedulerService {
    async fn create(&self, event: NewEvent) -> Result<Event, Error> {
        self.require_association(event.association_id).await?;
        let created = self.events.insert(&event).await?;
        self.notify(&created).await;
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Event>, Error> {
        Ok(self.events.list().await?)
    }

    async fn find_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Event>, Error> {
        Ok(self.events.list_for_association(association_id).await?)
    }

    async fn find_one(&self, id: EventId) -> Result<Event, Error> {
        self.require(id).await
    }

    async fn update(&self, id: EventId, changes: EventChanges) -> Result<Event, Error> {
        let mut event = self.require(id).await?;
        if let Some(association_id) = changes.association_id {
            self.require_association(association_id).await?;
        }
        event.apply(changes);
        self.events
            .replace(id, &event.to_fields())
            .await?
            .ok_or_else(|| Error::not_found(format!("event {id} not found")))
    }

    async fn remove(&self, id: EventId) -> Result<Event, Error> {
        let event = self.require(id).await?;
        if !self.events.delete(id).await? {
            return Err(Error::not_found(format!("event {id} not found")));
        }
        Ok(event)
    }

    async fn notify(&self, event: &Event) -> DispatchOutcome {
        let association = match self.associations.find_by_id(event.association_id()).await {
            Ok(Some(association)) => association,
            Ok(None) => {
                warn!(event_id = %event.id(), "event notice skipped: association is gone");
                return DispatchOutcome::Skipped;
            }
            Err(error) => {
                warn!(event_id = %event.id(), %error, "event notice skipped: association lookup failed");
                return DispatchOutcome::Skipped;
            }
        };
        debug!(
            event_id = %event.id(),
            attendees = association.members().len(),
            "sending event notice"
        );
        let notification = Notification::EventCreated(EventNotification::new(event, &association));
        match self.publisher.publish(&notification).await {
            Ok(()) => DispatchOutcome::Delivered,
            Err(error) => {
                warn!(event_id = %event.id(), %error, "event notice not delivered");
                DispatchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "event_scheduler_service_tests.rs"]
mod tests;
