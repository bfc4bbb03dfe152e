//! Driving port for the minute ledger.

use async_trait::async_trait;

use crate::domain::{AssociationId, Error, Minute, MinuteChanges, MinuteId, MinuteOrdering, NewMinute};

/// Use-cases over governance minutes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MinuteLedger: Send + Sync {
    /// Record a minute; every voter id must resolve.
    async fn create(&self, minute: NewMinute) -> Result<Minute, Error>;

    /// One minute; `NotFound` when absent.
    async fn find_one(&self, id: MinuteId) -> Result<Minute, Error>;

    /// All minutes.
    async fn find_all(&self) -> Result<Vec<Minute>, Error>;

    /// Minutes of an association in the requested order.
    async fn find_for_association(
        &self,
        association_id: AssociationId,
        ordering: MinuteOrdering,
    ) -> Result<Vec<Minute>, Error>;

    /// Apply a partial edit, re-checking any supplied references.
    async fn update(&self, id: MinuteId, changes: MinuteChanges) -> Result<Minute, Error>;

    /// Delete a minute; `NotFound` when absent.
    async fn remove(&self, id: MinuteId) -> Result<Minute, Error>;
}
