//! Reqwest-backed notification relay.
//!
//! Owns transport details only: envelope serialisation, timeout and HTTP
//! error mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::Notification;
use crate::domain::ports::{NotificationPublisher, NotificationPublisherError};

const ERROR_BODY_PREVIEW: usize = 256;

/// Wire envelope understood by the mail relay.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    pattern: &'a str,
    data: Value,
}

fn envelope(notification: &Notification) -> Result<Envelope<'_>, NotificationPublisherError> {
    let data = notification
        .payload()
        .map_err(|err| NotificationPublisherError::encode(err.to_string()))?;
    Ok(Envelope {
        pattern: notification.topic(),
        data,
    })
}

/// Publisher that POSTs each notification to one relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpNotificationPublisher {
    client: Client,
    endpoint: Url,
}

impl HttpNotificationPublisher {
    /// Build a publisher with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// Relay endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl NotificationPublisher for HttpNotificationPublisher {
    async fn publish(&self, notification: &Notification) -> Result<(), NotificationPublisherError> {
        let body = envelope(notification)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            debug!(topic = body.pattern, %status, "notification relayed");
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &text))
    }
}

fn map_transport_error(error: reqwest::Error) -> NotificationPublisherError {
    if error.is_timeout() {
        NotificationPublisherError::delivery(format!("relay timed out: {error}"))
    } else {
        NotificationPublisherError::delivery(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &str) -> NotificationPublisherError {
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
    NotificationPublisherError::delivery(format!("relay answered {status}: {preview}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::user;
    use crate::domain::RegistrationNotification;
    use rstest::rstest;

    #[rstest]
    fn envelope_carries_topic_and_payload() {
        let notification = Notification::Registration(RegistrationNotification::new(
            &user(1, "a@x.io"),
            "https://hub.example/",
        ));
        let body = serde_json::to_value(envelope(&notification).expect("envelope builds"))
            .expect("envelope serialises");

        assert_eq!(body["pattern"], "registration");
        assert_eq!(body["data"]["email"], "a@x.io");
    }

    #[rstest]
    #[case(StatusCode::BAD_GATEWAY)]
    #[case(StatusCode::UNPROCESSABLE_ENTITY)]
    fn status_errors_are_delivery_failures(#[case] status: StatusCode) {
        let long_body = "x".repeat(ERROR_BODY_PREVIEW * 2);
        let error = map_status_error(status, &long_body);
        let NotificationPublisherError::Delivery { message } = &error else {
            panic!("expected delivery error, got {error:?}");
        };
        assert!(message.contains(status.as_str()));
        assert!(message.len() < ERROR_BODY_PREVIEW + 64);
    }

    #[rstest]
    fn client_builds_for_valid_endpoint() {
        let endpoint = Url::parse("http://127.0.0.1:9/notify").expect("valid url");
        let publisher =
            HttpNotificationPublisher::new(endpoint.clone(), Duration::from_secs(1))
                .expect("client builds");
        assert_eq!(publisher.endpoint(), &endpoint);
    }
}
