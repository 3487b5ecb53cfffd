/// Best-effort notification dispatcher
///
/// Task creation triggers an email to the owner. The dispatch is strictly a
/// side channel: the task is already durably created and acknowledged before
/// the notification is attempted, and a failure here is logged and discarded,
/// never surfaced to the client.
///
/// The dispatcher is constructed once during process initialization and
/// injected into the application state. When SMTP is unconfigured the
/// explicit [`NullNotifier`] variant takes its place and succeeds as a no-op.

use async_trait::async_trait;
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::models::task::Task;

/// Error type for notification dispatch
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Recipient or sender address failed to parse
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    BuildError(String),

    /// SMTP transport failure
    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// A dispatcher for owner-facing notifications
///
/// Implementations must be ready before first use; the API constructs one at
/// startup and shares it behind an `Arc`.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifies an owner that one of their tasks was created
    async fn task_created(&self, to: &str, task: &Task) -> Result<(), NotifyError>;
}

/// SMTP-backed notifier
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Builds an SMTP notifier from transport settings
    ///
    /// # Errors
    ///
    /// Returns an error if the relay host or sender address is invalid
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: String,
        from: &str,
    ) -> Result<Self, NotifyError> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::InvalidAddress(format!("sender {}: {}", from, e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError::Transport(format!("relay {}: {}", host, e)))?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn task_created(&self, to: &str, task: &Task) -> Result<(), NotifyError> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::InvalidAddress(format!("recipient {}: {}", to, e)))?;

        let body = format!(
            "Your task \"{}\" was created.\n\nDue: {}\nPriority: {}\nStatus: {}\n",
            task.title,
            task.due_date.to_rfc3339(),
            task.priority.as_str(),
            task.status.as_str(),
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("New task created: {}", task.title))
            .body(body)
            .map_err(|e| NotifyError::BuildError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// No-op notifier used when SMTP is unconfigured
///
/// An explicit variant rather than an optional transport: dispatch always has
/// a notifier to call, and the degraded mode is visible in the logs.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn task_created(&self, to: &str, task: &Task) -> Result<(), NotifyError> {
        debug!(recipient = %to, task_id = %task.id, "Mail transport unconfigured, dropping task-created notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            description: None,
            due_date: Utc::now(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            assignee: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_null_notifier_always_succeeds() {
        let notifier = NullNotifier;
        let task = sample_task();

        assert!(notifier.task_created("owner@example.com", &task).await.is_ok());
        // Even a garbage recipient is fine, nothing is parsed
        assert!(notifier.task_created("not-an-address", &task).await.is_ok());
    }

    #[test]
    fn test_smtp_notifier_rejects_bad_sender() {
        let result = SmtpNotifier::new(
            "smtp.example.com",
            587,
            "user".to_string(),
            "pass".to_string(),
            "not an address",
        );
        assert!(matches!(result, Err(NotifyError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_smtp_notifier_rejects_bad_recipient() {
        let notifier = SmtpNotifier::new(
            "smtp.example.com",
            587,
            "user".to_string(),
            "pass".to_string(),
            "taskmaster@example.com",
        )
        .unwrap();

        let task = sample_task();
        let result = notifier.task_created("not an address", &task).await;
        assert!(matches!(result, Err(NotifyError::InvalidAddress(_))));
    }
}
