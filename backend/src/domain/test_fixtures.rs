//! Builders shared by domain unit tests.

use chrono::{NaiveDate, TimeZone, Utc};

use super::{
    Age, Association, AssociationId, AssociationName, CredentialHash, Email, Event, EventId,
    EventName, Minute, MinuteContent, MinuteId, NewEvent, NewMinute, NewUser, PersonName, User,
    UserId, VerificationToken,
};

pub(crate) fn user_id(raw: i32) -> UserId {
    UserId::new(raw).expect("fixture user id is positive")
}

pub(crate) fn association_id(raw: i32) -> AssociationId {
    AssociationId::new(raw).expect("fixture association id is positive")
}

pub(crate) fn new_user(email: &str) -> NewUser {
    NewUser {
        email: Email::new(email).expect("fixture email is valid"),
        firstname: PersonName::new("Ada", "firstname").expect("fixture name is valid"),
        lastname: PersonName::new("Lovelace", "lastname").expect("fixture name is valid"),
        age: Age::new(36).expect("fixture age is valid"),
        credential: CredentialHash::new("salt$hash"),
        verified: true,
        verification_token: VerificationToken::new(format!("token-{email}")),
    }
}

pub(crate) fn user(id: i32, email: &str) -> User {
    User::from_parts(user_id(id), new_user(email))
}

pub(crate) fn association(id: i32, name: &str, members: Vec<User>) -> Association {
    Association::new(
        association_id(id),
        AssociationName::new(name).expect("fixture association name is valid"),
        members,
    )
}

pub(crate) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("fixture date is valid")
}

pub(crate) fn minute(
    id: i32,
    association: i32,
    content: &str,
    on: &str,
    voters: Vec<User>,
) -> Minute {
    Minute::from_parts(
        MinuteId::new(id).expect("fixture minute id is positive"),
        NewMinute {
            association_id: association_id(association),
            content: MinuteContent::new(content).expect("fixture content is valid"),
            date: date(on),
            voter_ids: voters.iter().map(User::id).collect(),
        },
        voters,
    )
}

pub(crate) fn new_event(association: i32, name: &str) -> NewEvent {
    let start = Utc
        .with_ymd_and_hms(2021, 6, 1, 18, 0, 0)
        .single()
        .expect("fixture instant is valid");
    NewEvent {
        name: EventName::new(name).expect("fixture event name is valid"),
        start,
        end: start + chrono::Duration::hours(2),
        association_id: association_id(association),
    }
}

pub(crate) fn event(id: i32, association: i32, name: &str) -> Event {
    Event::from_parts(
        EventId::new(id).expect("fixture event id is positive"),
        new_event(association, name),
    )
}
