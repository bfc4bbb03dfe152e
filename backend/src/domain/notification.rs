//! Outbound notification payloads.
//!
//! Notifications are fire-and-forget messages handed to an external
//! transport. Each carries a topic name and a JSON payload whose keys match
//! what downstream mailers expect.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Association, Email, Event, User, VerificationToken};

/// Topic emitted when an event is scheduled.
pub const EVENT_CREATED_TOPIC: &str = "event_created";
/// Topic emitted when a user registers.
pub const REGISTRATION_TOPIC: &str = "registration";

/// Payload announcing a new event to its association's members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNotification {
    /// Event name.
    pub name: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// Name of the owning association.
    pub association_name: String,
    /// Emails of the members at dispatch time.
    pub attendees_emails: Vec<String>,
}

impl EventNotification {
    /// Build the payload from an event and its resolved association.
    #[must_use]
    pub fn new(event: &Event, association: &Association) -> Self {
        Self {
            name: event.name().as_ref().to_owned(),
            start: event.start(),
            end: event.end(),
            association_name: association.name().as_ref().to_owned(),
            attendees_emails: association
                .members()
                .iter()
                .map(|member| member.email().as_ref().to_owned())
                .collect(),
        }
    }
}

/// Payload asking a new user to confirm their email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationNotification {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Link that confirms the email.
    pub validation_url: String,
    /// Recipient.
    pub email: Email,
}

impl RegistrationNotification {
    /// Build the payload; `frontend_url` is used verbatim as the link prefix.
    #[must_use]
    pub fn new(user: &User, frontend_url: &str) -> Self {
        Self {
            first_name: user.firstname().as_ref().to_owned(),
            last_name: user.lastname().as_ref().to_owned(),
            validation_url: validation_url(frontend_url, user.verification_token()),
            email: user.email().clone(),
        }
    }
}

fn validation_url(frontend_url: &str, token: &VerificationToken) -> String {
    format!("{frontend_url}verify?t={}", token.as_str())
}

/// Message handed to the notification transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// An event was scheduled.
    EventCreated(EventNotification),
    /// A user registered.
    Registration(RegistrationNotification),
}

impl Notification {
    /// Transport topic.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::EventCreated(_) => EVENT_CREATED_TOPIC,
            Self::Registration(_) => REGISTRATION_TOPIC,
        }
    }

    /// JSON payload.
    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::EventCreated(payload) => serde_json::to_value(payload),
            Self::Registration(payload) => serde_json::to_value(payload),
        }
    }
}

/// Result of a best-effort dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message.
    Delivered,
    /// The transport failed; the failure was logged.
    Failed,
    /// Nothing was sent because the payload could not be assembled.
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{association, event, user};
    use rstest::rstest;

    #[rstest]
    fn event_payload_lists_member_emails() {
        let club = association(1, "Club", vec![user(7, "a@x.io"), user(8, "b@x.io")]);
        let payload = EventNotification::new(&event(1, 1, "Assembly"), &club);

        let mut emails = payload.attendees_emails.clone();
        emails.sort();
        assert_eq!(emails, vec!["a@x.io", "b@x.io"]);
        assert_eq!(payload.association_name, "Club");
    }

    #[rstest]
    fn event_payload_uses_transport_keys() {
        let club = association(1, "Club", vec![user(7, "a@x.io")]);
        let notification = Notification::EventCreated(EventNotification::new(
            &event(1, 1, "Assembly"),
            &club,
        ));
        let payload = notification.payload().expect("payload serialises");

        assert_eq!(notification.topic(), "event_created");
        for key in ["name", "start", "end", "associationName", "attendeesEmails"] {
            assert!(payload.get(key).is_some(), "missing key {key}");
        }
    }

    #[rstest]
    fn registration_link_appends_token() {
        let member = user(7, "a@x.io");
        let payload = RegistrationNotification::new(&member, "https://hub.example/");
        assert_eq!(
            payload.validation_url,
            format!("https://hub.example/verify?t={}", member.verification_token().as_str())
        );
        let notification = Notification::Registration(payload);
        assert_eq!(notification.topic(), "registration");
        let value = notification.payload().expect("payload serialises");
        assert!(value.get("firstName").is_some());
        assert!(value.get("validationUrl").is_some());
    }
}
