//! Notification transport adapters.
//!
//! Notifications are fire-and-forget messages consumed by an external mailer.
//! [`HttpNotificationPublisher`] posts each message as
//! `{"pattern": <topic>, "data": <payload>}` to a relay endpoint;
//! [`LoggingNotificationPublisher`] only records the message and is wired in
//! when no endpoint is configured.

mod http_publisher;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Notification;
use crate::domain::ports::{NotificationPublisher, NotificationPublisherError};

pub use http_publisher::HttpNotificationPublisher;

/// Publisher that logs each notification and reports success.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotificationPublisher;

impl LoggingNotificationPublisher {
    /// Create a logging publisher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationPublisher for LoggingNotificationPublisher {
    async fn publish(&self, notification: &Notification) -> Result<(), NotificationPublisherError> {
        let payload = notification
            .payload()
            .map_err(|err| NotificationPublisherError::encode(err.to_string()))?;
        info!(
            topic = notification.topic(),
            %payload,
            "notification recorded without a transport"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{association, event, user};
    use crate::domain::EventNotification;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn logging_publisher_accepts_every_notification() {
        let club = association(1, "Club", vec![user(1, "a@x.io")]);
        let notification =
            Notification::EventCreated(EventNotification::new(&event(1, 1, "Assembly"), &club));

        let result = LoggingNotificationPublisher::new().publish(&notification).await;
        assert!(result.is_ok());
    }
}
