//! Port for handing notifications to the message transport.

use async_trait::async_trait;

use crate::domain::Notification;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification transports.
    pub enum NotificationPublisherError {
        /// The payload could not be encoded.
        Encode { message: String } =>
            "notification payload could not be encoded: {message}" as internal,
        /// The transport rejected or never received the message.
        Delivery { message: String } =>
            "notification delivery failed: {message}" as service_unavailable,
    }
}

/// Fire-and-forget publisher of named notifications.
///
/// Delivery guarantees belong to the transport; callers log failures and move
/// on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publish one notification.
    async fn publish(&self, notification: &Notification) -> Result<(), NotificationPublisherError>;
}
