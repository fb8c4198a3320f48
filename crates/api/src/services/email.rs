//! Email service for account verification messages.
//!
//! Providers:
//! - `console`: logs emails to the application log (development)
//!
//! When `enabled` is false the service drops messages silently, which
//! keeps signup working in environments with no mail infrastructure.

use thiserror::Error;
use tracing::info;

use crate::config::EmailConfig;

/// Error type for email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Unknown email provider: {0}")]
    UnknownProvider(String),
}

/// An outbound email message.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email sending service.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send a message through the configured provider.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            tracing::debug!(to = %message.to, "Email sending disabled, dropping message");
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            other => Err(EmailError::UnknownProvider(other.to_string())),
        }
    }

    /// Send the account-verification email with the confirmation token.
    pub async fn send_verification_email(
        &self,
        to: &str,
        username: &str,
        token: &str,
    ) -> Result<(), EmailError> {
        let message = EmailMessage {
            to: to.to_string(),
            subject: format!("Welcome @{}! Verify your account to start using Comparte Ride", username),
            body: format!(
                "Hi @{}!\n\nVerify your account with this token:\n\n{}\n\nThe token expires in 3 days.\n\n{}",
                username, token, self.config.sender_name
            ),
        };
        self.send(message).await
    }

    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            from = %format!("{} <{}>", self.config.sender_name, self.config.sender_email),
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Email (console provider)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            sender_email: "noreply@test.com".to_string(),
            sender_name: "Test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(console_config());
        let result = service
            .send_verification_email("user@example.com", "testuser", "some-token")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_service_drops_message() {
        let mut config = console_config();
        config.enabled = false;
        let service = EmailService::new(config);
        let result = service
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "subject".to_string(),
                body: "body".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_errors() {
        let mut config = console_config();
        config.provider = "smtp".to_string();
        let service = EmailService::new(config);
        let result = service
            .send(EmailMessage {
                to: "user@example.com".to_string(),
                subject: "subject".to_string(),
                body: "body".to_string(),
            })
            .await;
        assert!(matches!(result, Err(EmailError::UnknownProvider(_))));
    }
}
