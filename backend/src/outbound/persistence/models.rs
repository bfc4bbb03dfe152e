//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types run
//! through the validating constructors and surface failures as query errors.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{
    Age, AssociationId, AssociationName, CredentialHash, Email, EventId, EventName, MinuteContent,
    MinuteId, NewEvent, NewUser, PersonName, Role, RoleName, User, UserId, VerificationToken,
};

use super::schema::{
    association_members, associations, events, minute_voters, minutes, roles, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub age: i32,
    pub password_hash: String,
    pub verified: bool,
    pub verification_token: String,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            id,
            email,
            firstname,
            lastname,
            age,
            password_hash,
            verified,
            verification_token,
        } = row;
        let age = u16::try_from(age).map_err(|err| format!("user {id} age {age}: {err}"))?;
        Ok(User::from_parts(
            UserId::new(id).map_err(|err| err.to_string())?,
            NewUser {
                email: Email::new(email).map_err(|err| err.to_string())?,
                firstname: PersonName::new(firstname, "firstname").map_err(|err| err.to_string())?,
                lastname: PersonName::new(lastname, "lastname").map_err(|err| err.to_string())?,
                age: Age::new(age).map_err(|err| err.to_string())?,
                credential: CredentialHash::new(password_hash),
                verified,
                verification_token: VerificationToken::new(verification_token),
            },
        ))
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub age: i32,
    pub password_hash: &'a str,
    pub verified: bool,
    pub verification_token: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            email: user.email.as_ref(),
            firstname: user.firstname.as_ref(),
            lastname: user.lastname.as_ref(),
            age: i32::from(user.age.years()),
            password_hash: user.credential.as_str(),
            verified: user.verified,
            verification_token: user.verification_token.as_str(),
        }
    }
}

/// Changeset struct for updating user records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub age: i32,
    pub password_hash: &'a str,
    pub verified: bool,
}

impl<'a> From<&'a User> for UserUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            firstname: user.firstname().as_ref(),
            lastname: user.lastname().as_ref(),
            age: i32::from(user.age().years()),
            password_hash: user.credential().as_str(),
            verified: user.is_verified(),
        }
    }
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

/// Row struct for reading from the associations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = associations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssociationRow {
    pub id: i32,
    pub name: String,
}

impl AssociationRow {
    pub(crate) fn parts(&self) -> Result<(AssociationId, AssociationName), String> {
        Ok((
            AssociationId::new(self.id).map_err(|err| err.to_string())?,
            AssociationName::new(&self.name).map_err(|err| err.to_string())?,
        ))
    }
}

/// Insertable/changeset struct for association records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = associations)]
pub(crate) struct NewAssociationRow<'a> {
    pub name: &'a str,
}

/// Roster link row.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = association_members)]
pub(crate) struct MemberRow {
    pub association_id: i32,
    pub user_id: i32,
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Row struct for the roles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub user_id: i32,
    pub association_id: i32,
    pub name: String,
}

impl TryFrom<RoleRow> for Role {
    type Error = String;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role::new(
            UserId::new(row.user_id).map_err(|err| err.to_string())?,
            AssociationId::new(row.association_id).map_err(|err| err.to_string())?,
            RoleName::new(row.name).map_err(|err| err.to_string())?,
        ))
    }
}

/// Insertable struct for role upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = roles)]
pub(crate) struct NewRoleRow<'a> {
    pub user_id: i32,
    pub association_id: i32,
    pub name: &'a str,
}

impl<'a> From<&'a Role> for NewRoleRow<'a> {
    fn from(role: &'a Role) -> Self {
        Self {
            user_id: role.user_id().get(),
            association_id: role.association_id().get(),
            name: role.name().as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Minutes
// ---------------------------------------------------------------------------

/// Row struct for reading from the minutes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = minutes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MinuteRow {
    pub id: i32,
    pub association_id: i32,
    pub content: String,
    pub meeting_date: NaiveDate,
}

impl MinuteRow {
    pub(crate) fn parts(&self) -> Result<(MinuteId, AssociationId, MinuteContent), String> {
        Ok((
            MinuteId::new(self.id).map_err(|err| err.to_string())?,
            AssociationId::new(self.association_id).map_err(|err| err.to_string())?,
            MinuteContent::new(self.content.clone()).map_err(|err| err.to_string())?,
        ))
    }
}

/// Insertable/changeset struct for minute records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = minutes)]
pub(crate) struct NewMinuteRow<'a> {
    pub association_id: i32,
    pub content: &'a str,
    pub meeting_date: NaiveDate,
}

/// Voter link row.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = minute_voters)]
pub(crate) struct VoterRow {
    pub minute_id: i32,
    pub user_id: i32,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i32,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub association_id: i32,
}

impl TryFrom<EventRow> for crate::domain::Event {
    type Error = String;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self::from_parts(
            EventId::new(row.id).map_err(|err| err.to_string())?,
            NewEvent {
                name: EventName::new(row.name).map_err(|err| err.to_string())?,
                start: row.starts_at,
                end: row.ends_at,
                association_id: AssociationId::new(row.association_id)
                    .map_err(|err| err.to_string())?,
            },
        ))
    }
}

/// Insertable/changeset struct for event records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub name: &'a str,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub association_id: i32,
}

impl<'a> From<&'a NewEvent> for NewEventRow<'a> {
    fn from(event: &'a NewEvent) -> Self {
        Self {
            name: event.name.as_ref(),
            starts_at: event.start,
            ends_at: event.end,
            association_id: event.association_id.get(),
        }
    }
}
