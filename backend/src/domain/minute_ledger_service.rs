//! Minute ledger domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::association::dedup_ids;
use crate::domain::ports::{
    AssociationRepository, MinuteLedger, MinuteRepository, UserRepository,
};
use crate::domain::{
    AssociationId, Error, Minute, MinuteChanges, MinuteId, MinuteOrdering, NewMinute, UserId,
};

/// Minute ledger backed by minute, association and user repositories.
#[derive(Clone)]
pub struct MinuteLedgerService {
    minutes: Arc<dyn MinuteRepository>,
    associations: Arc<dyn AssociationRepository>,
    users: Arc<dyn UserRepository>,
}

impl MinuteLedgerService {
    /// Create a service over the given repositories.
    pub fn new(
        minutes: Arc<dyn MinuteRepository>,
        associations: Arc<dyn AssociationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            minutes,
            associations,
            users,
        }
    }

    async fn require(&self, id: MinuteId) -> Result<Minute, Error> {
        self.minutes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("minute {id} not found")))
    }

    async fn require_association(&self, id: AssociationId) -> Result<(), Error> {
        match self.associations.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("association {id} not found"))),
        }
    }

    /// Fail unless every requested voter names an existing user.
    async fn resolve_voters(&self, requested: &[UserId]) -> Result<Vec<UserId>, Error> {
        let voter_ids = dedup_ids(requested.iter().copied());
        let found = self.users.find_many_by_id(&voter_ids).await?;
        if found.len() != voter_ids.len() {
            let missing: Vec<String> = voter_ids
                .iter()
                .filter(|id| !found.iter().any(|user| user.id() == **id))
                .map(ToString::to_string)
                .collect();
            return Err(Error::not_found(format!(
                "voters not found: {}",
                missing.join(", ")
            )));
        }
        Ok(voter_ids)
    }
}

#[async_trait]
impl MinuteLedger for MinuteLedgerService {
    async fn create(&self, minute: NewMinute) -> Result<Minute, Error> {
        self.require_association(minute.association_id).await?;
        let voter_ids = self.resolve_voters(&minute.voter_ids).await?;
        let fields = NewMinute {
            voter_ids,
            ..minute
        };
        Ok(self.minutes.insert(&fields).await?)
    }

    async fn find_one(&self, id: MinuteId) -> Result<Minute, Error> {
        self.require(id).await
    }

    async fn find_all(&self) -> Result<Vec<Minute>, Error> {
        Ok(self.minutes.list().await?)
    }

    async fn find_for_association(
        &self,
        association_id: AssociationId,
        ordering: MinuteOrdering,
    ) -> Result<Vec<Minute>, Error> {
        let mut minutes = self.minutes.list_for_association(association_id).await?;
        ordering.sort(&mut minutes);
        Ok(minutes)
    }

    async fn update(&self, id: MinuteId, changes: MinuteChanges) -> Result<Minute, Error> {
        let mut fields = self.require(id).await?.to_fields();
        let MinuteChanges {
            content,
            date,
            association_id,
            voter_ids,
        } = changes;
        if let Some(content) = content {
            fields.content = content;
        }
        if let Some(date) = date {
            fields.date = date;
        }
        if let Some(association_id) = association_id {
            self.require_association(association_id).await?;
            fields.association_id = association_id;
        }
        if let Some(voter_ids) = voter_ids {
            fields.voter_ids = self.resolve_voters(&voter_ids).await?;
        }
        self.minutes
            .replace(id, &fields)
            .await?
            .ok_or_else(|| Error::not_found(format!("minute {id} not found")))
    }

    async fn remove(&self, id: MinuteId) -> Result<Minute, Error> {
        let minute = self.require(id).await?;
        if !self.minutes.delete(id).await? {
            return Err(Error::not_found(format!("minute {id} not found")));
        }
        Ok(minute)
    }
}

#[cfg(test)]
#[path = "minute_ledger_service_tests.rs"]
mod tests;
