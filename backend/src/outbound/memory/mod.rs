//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and as the storage for
//! end-to-end tests. Referential behaviour mirrors the PostgreSQL schema:
//! deleting a user drops them from rosters, voter lists and roles. Deleting
//! an association drops its roster but leaves its role rows.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    AssociationRepository, AssociationRepositoryError, EventRepository, EventRepositoryError,
    MinuteRepository, MinuteRepositoryError, RoleRepository, RoleRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Association, AssociationId, AssociationName, Email, Event, EventId, Minute, MinuteId,
    NewAssociation, NewEvent, NewMinute, NewUser, Role, RoleKey, RoleName, User, UserId,
    VerificationToken,
};

/// Serial counter mirroring a PostgreSQL `SERIAL` column.
#[derive(Debug, Default)]
struct Serial(i32);

impl Serial {
    fn next(&mut self) -> i32 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    user_ids: Serial,
    associations: BTreeMap<AssociationId, (AssociationName, Vec<UserId>)>,
    association_ids: Serial,
    roles: BTreeMap<RoleKey, RoleName>,
    minutes: BTreeMap<MinuteId, NewMinute>,
    minute_ids: Serial,
    events: BTreeMap<EventId, NewEvent>,
    event_ids: Serial,
}

impl Tables {
    fn resolve_users(&self, ids: &[UserId]) -> Vec<User> {
        ids.iter()
            .filter_map(|id| self.users.get(id).cloned())
            .collect()
    }

    fn association(&self, id: AssociationId) -> Option<Association> {
        self.associations.get(&id).map(|(name, member_ids)| {
            Association::new(id, name.clone(), self.resolve_users(member_ids))
        })
    }

    fn minute(&self, id: MinuteId) -> Option<Minute> {
        self.minutes.get(&id).map(|fields| {
            let voters = self.resolve_users(&fields.voter_ids);
            let fields = NewMinute {
                voter_ids: voters.iter().map(User::id).collect(),
                ..fields.clone()
            };
            Minute::from_parts(id, fields, voters)
        })
    }

    fn role(&self, key: RoleKey) -> Option<Role> {
        self.roles
            .get(&key)
            .map(|name| Role::new(key.user_id, key.association_id, name.clone()))
    }
}

/// Shared in-memory tables; clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_from_serial<T, E>(raw: i32, build: impl FnOnce(i32) -> Result<T, E>) -> Result<T, String>
where
    E: std::fmt::Display,
{
    build(raw).map_err(|err| err.to_string())
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|stored| stored.email() == &user.email) {
            return Err(UserRepositoryError::duplicate_email(user.email.as_ref()));
        }
        let raw = tables.user_ids.next();
        let id = id_from_serial(raw, UserId::new).map_err(UserRepositoryError::query)?;
        let stored = User::from_parts(id, user.clone());
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.users.get_mut(&user.id()) {
            *stored = user.clone();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_many_by_id(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|user| ids.contains(&user.id()))
            .cloned()
            .collect())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.verification_token() == token)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        let total = self.tables.read().await.users.len();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        for (_, member_ids) in tables.associations.values_mut() {
            member_ids.retain(|member| *member != id);
        }
        for minute in tables.minutes.values_mut() {
            minute.voter_ids.retain(|voter| *voter != id);
        }
        tables.roles.retain(|key, _| key.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AssociationRepository for InMemoryStore {
    async fn insert(
        &self,
        association: &NewAssociation,
    ) -> Result<Association, AssociationRepositoryError> {
        let mut tables = self.tables.write().await;
        let raw = tables.association_ids.next();
        let id = id_from_serial(raw, AssociationId::new).map_err(AssociationRepositoryError::query)?;
        let member_ids = association
            .member_ids
            .iter()
            .copied()
            .filter(|member| tables.users.contains_key(member))
            .collect();
        tables
            .associations
            .insert(id, (association.name.clone(), member_ids));
        tables
            .association(id)
            .ok_or_else(|| AssociationRepositoryError::query("inserted association vanished"))
    }

    async fn replace(
        &self,
        id: AssociationId,
        association: &NewAssociation,
    ) -> Result<Option<Association>, AssociationRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.associations.contains_key(&id) {
            return Ok(None);
        }
        let member_ids = association
            .member_ids
            .iter()
            .copied()
            .filter(|member| tables.users.contains_key(member))
            .collect();
        tables
            .associations
            .insert(id, (association.name.clone(), member_ids));
        Ok(tables.association(id))
    }

    async fn find_by_id(
        &self,
        id: AssociationId,
    ) -> Result<Option<Association>, AssociationRepositoryError> {
        Ok(self.tables.read().await.association(id))
    }

    async fn list(&self) -> Result<Vec<Association>, AssociationRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .associations
            .keys()
            .filter_map(|id| tables.association(*id))
            .collect())
    }

    async fn list_for_member(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Association>, AssociationRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .associations
            .iter()
            .filter(|(_, (_, member_ids))| member_ids.contains(&user_id))
            .filter_map(|(id, _)| tables.association(*id))
            .collect())
    }

    async fn delete(&self, id: AssociationId) -> Result<bool, AssociationRepositoryError> {
        Ok(self.tables.write().await.associations.remove(&id).is_some())
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn upsert(&self, role: &Role) -> Result<(), RoleRepositoryError> {
        self.tables
            .write()
            .await
            .roles
            .insert(role.key(), role.name().clone());
        Ok(())
    }

    async fn find(&self, key: RoleKey) -> Result<Option<Role>, RoleRepositoryError> {
        Ok(self.tables.read().await.role(key))
    }

    async fn list(&self) -> Result<Vec<Role>, RoleRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .keys()
            .filter_map(|key| tables.role(*key))
            .collect())
    }

    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Role>, RoleRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .keys()
            .filter(|key| key.association_id == association_id)
            .filter_map(|key| tables.role(*key))
            .collect())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Role>, RoleRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .keys()
            .filter(|key| key.user_id == user_id)
            .filter_map(|key| tables.role(*key))
            .collect())
    }

    async fn list_by_name(&self, name: &RoleName) -> Result<Vec<Role>, RoleRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .iter()
            .filter(|(_, stored)| *stored == name)
            .map(|(key, stored)| Role::new(key.user_id, key.association_id, stored.clone()))
            .collect())
    }

    async fn delete(&self, key: RoleKey) -> Result<bool, RoleRepositoryError> {
        Ok(self.tables.write().await.roles.remove(&key).is_some())
    }

    async fn delete_many(&self, keys: &[RoleKey]) -> Result<u64, RoleRepositoryError> {
        let mut tables = self.tables.write().await;
        let removed = keys
            .iter()
            .filter(|key| tables.roles.remove(*key).is_some())
            .count();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl MinuteRepository for InMemoryStore {
    async fn insert(&self, minute: &NewMinute) -> Result<Minute, MinuteRepositoryError> {
        let mut tables = self.tables.write().await;
        let raw = tables.minute_ids.next();
        let id = id_from_serial(raw, MinuteId::new).map_err(MinuteRepositoryError::query)?;
        tables.minutes.insert(id, minute.clone());
        tables
            .minute(id)
            .ok_or_else(|| MinuteRepositoryError::query("inserted minute vanished"))
    }

    async fn replace(
        &self,
        id: MinuteId,
        minute: &NewMinute,
    ) -> Result<Option<Minute>, MinuteRepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.minutes.get_mut(&id) {
            Some(stored) => *stored = minute.clone(),
            None => return Ok(None),
        }
        Ok(tables.minute(id))
    }

    async fn find_by_id(&self, id: MinuteId) -> Result<Option<Minute>, MinuteRepositoryError> {
        Ok(self.tables.read().await.minute(id))
    }

    async fn list(&self) -> Result<Vec<Minute>, MinuteRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .minutes
            .keys()
            .filter_map(|id| tables.minute(*id))
            .collect())
    }

    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Minute>, MinuteRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .minutes
            .iter()
            .filter(|(_, fields)| fields.association_id == association_id)
            .filter_map(|(id, _)| tables.minute(*id))
            .collect())
    }

    async fn delete(&self, id: MinuteId) -> Result<bool, MinuteRepositoryError> {
        Ok(self.tables.write().await.minutes.remove(&id).is_some())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError> {
        let mut tables = self.tables.write().await;
        let raw = tables.event_ids.next();
        let id = id_from_serial(raw, EventId::new).map_err(EventRepositoryError::query)?;
        tables.events.insert(id, event.clone());
        Ok(Event::from_parts(id, event.clone()))
    }

    async fn replace(
        &self,
        id: EventId,
        event: &NewEvent,
    ) -> Result<Option<Event>, EventRepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.events.get_mut(&id) {
            Some(stored) => {
                *stored = event.clone();
                Ok(Some(Event::from_parts(id, event.clone())))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .get(&id)
            .map(|fields| Event::from_parts(id, fields.clone())))
    }

    async fn list(&self) -> Result<Vec<Event>, EventRepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .iter()
            .map(|(id, fields)| Event::from_parts(*id, fields.clone()))
            .collect())
    }

    async fn list_for_association(
        &self,
        association_id: AssociationId,
    ) -> Result<Vec<Event>, EventRepositoryError> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|(_, fields)| fields.association_id == association_id)
            .map(|(id, fields)| Event::from_parts(*id, fields.clone()))
            .collect();
        events.sort_by_key(|event| (event.start(), event.id()));
        Ok(events)
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError> {
        Ok(self.tables.write().await.events.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests;
