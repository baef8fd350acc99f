//! Email service for the welcome mail sent when an admin creates an
//! employee account.
//!
//! Supported providers:
//! - `console`: Logs emails to console (development)
//! - `smtp`: Sends via SMTP server

use crate::config::EmailConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name
    pub to_name: Option<String>,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
    /// HTML body (optional)
    pub body_html: Option<String>,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "smtp" => self.send_smtp(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send the welcome email with the initial credentials to a freshly
    /// created employee account.
    pub async fn send_welcome_email(
        &self,
        to_email: &str,
        to_name: &str,
        password: &str,
    ) -> Result<(), EmailError> {
        let subject = "Welcome to StockSync";

        let body_text = format!(
            r#"Hi {name},

Your StockSync account has been created.

Email: {email}
Password: {password}

You can sign in to the dashboard right away and request the equipment you
need. Please change your password after your first login.

Best regards,
The StockSync Team"#,
            name = to_name,
            email = to_email,
            password = password
        );

        let body_html = Some(format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Welcome to StockSync</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #1f6feb; padding: 30px; border-radius: 10px 10px 0 0;">
        <h1 style="color: white; margin: 0; font-size: 24px;">StockSync</h1>
    </div>
    <div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px;">
        <h2 style="color: #333; margin-top: 0;">Welcome, {name}</h2>
        <p>Your StockSync account has been created. Use the credentials below to sign in:</p>
        <p style="background: #fff; border: 1px solid #ddd; border-radius: 6px; padding: 16px;">
            Email: <strong>{email}</strong><br>
            Password: <strong>{password}</strong>
        </p>
        <p style="color: #666; font-size: 14px;">Please change your password after your first login.</p>
    </div>
</body>
</html>"#,
            name = to_name,
            email = to_email,
            password = password
        ));

        let message = EmailMessage {
            to: to_email.to_string(),
            to_name: Some(to_name.to_string()),
            subject: subject.to_string(),
            body_text,
            body_html,
        };

        self.send(message).await
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );

        info!(
            body_text = %message.body_text,
            "Email body (plain text)"
        );

        Ok(())
    }

    /// SMTP provider.
    async fn send_smtp(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.smtp_host.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        // TODO: wire up lettre for real SMTP delivery; until then log the
        // send so the flow is observable in staging.
        warn!(
            provider = "smtp",
            host = %self.config.smtp_host,
            port = %self.config.smtp_port,
            "SMTP provider configured but delivery is logged only"
        );

        info!(
            to = %message.to,
            subject = %message.subject,
            "Email (smtp provider, logged)"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_console_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            ..EmailConfig::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_service_is_a_noop() {
        let service = EmailService::new(EmailConfig::default());
        assert!(!service.is_enabled());

        let result = service
            .send_welcome_email("jane@stocksync.app", "Jane", "pw")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_console_provider_sends() {
        let service = EmailService::new(enabled_console_config());
        let result = service
            .send_welcome_email("jane@stocksync.app", "Jane", "pw")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_errors() {
        let config = EmailConfig {
            enabled: true,
            provider: "pigeon".to_string(),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);
        let result = service.send_welcome_email("a@b.c", "A", "pw").await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_smtp_without_host_not_configured() {
        let config = EmailConfig {
            enabled: true,
            provider: "smtp".to_string(),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);
        let result = service.send_welcome_email("a@b.c", "A", "pw").await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }
}
