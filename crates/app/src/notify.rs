//! Transient user notifications
//!
//! Screens push success/error/warning messages here; the front end drains
//! them from a broadcast receiver.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Error, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.publish(NotificationKind::Warning, message.into());
    }

    /// Error notification carrying the backend's message when it sent one
    pub fn backend_error(&self, error: &sede_net::Error, fallback: &str) {
        let message = error
            .body()
            .and_then(backend_error_message)
            .unwrap_or_else(|| fallback.to_string());
        self.error(message);
    }

    fn publish(&self, kind: NotificationKind, message: String) {
        match kind {
            NotificationKind::Error => tracing::warn!(%message, "Notification"),
            _ => tracing::info!(?kind, %message, "Notification"),
        }

        // No receivers is fine: nobody is looking at the screen
        let _ = self.sender.send(Notification {
            id: Uuid::new_v4(),
            kind,
            message,
            created_at: Utc::now(),
        });
    }
}

/// Extract a displayable message from an error response body.
///
/// Accepts a JSON string, an object with an `error` string, or plain text.
pub fn backend_error_message(body: &str) -> Option<String> {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(fields)) => match fields.get("error") {
            Some(Value::String(s)) => s.clone(),
            _ => return None,
        },
        Ok(_) => return None,
        Err(_) => body.to_string(),
    };

    let trimmed = message.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message_shapes() {
        assert_eq!(
            backend_error_message(r#"{"error":"Senha incorreta"}"#).as_deref(),
            Some("Senha incorreta")
        );
        assert_eq!(
            backend_error_message(r#""Usuario nao encontrado""#).as_deref(),
            Some("Usuario nao encontrado")
        );
        assert_eq!(
            backend_error_message("Bad Gateway").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(backend_error_message(r#"{"message":"x"}"#), None);
        assert_eq!(backend_error_message("   "), None);
    }

    #[tokio::test]
    async fn test_backend_error_uses_fallback() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        let err = sede_net::Error::Api {
            status: 500,
            body: "{}".into(),
        };
        notifier.backend_error(&err, "Could not save.");

        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Could not save.");
    }

    #[test]
    fn test_publish_without_receivers() {
        Notifier::new().success("ok");
    }
}
