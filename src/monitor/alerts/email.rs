// SMTP Mail Transport - Using lettre

use crate::Result;
use crate::error::WatchError;
use crate::monitor::alerts::{MailTransport, OutgoingMail};
use crate::monitor::config::{SmtpSecurity, SmtpSettings};
use async_trait::async_trait;
use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

/// Delivers mail through the configured SMTP relay
pub struct SmtpMailTransport {
    settings: SmtpSettings,
}

impl SmtpMailTransport {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Build a plain-text message
    fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        let mut message_builder = Message::builder()
            .from(mail.from.parse()?)
            .subject(mail.subject.clone());

        // Add all recipients
        for to_addr in &mail.to {
            message_builder = message_builder.to(to_addr.parse()?);
        }

        let message = message_builder
            .header(header::ContentType::TEXT_PLAIN)
            .body(mail.text.clone())?;

        Ok(message)
    }

    /// Get SMTP transport
    fn get_transport(&self) -> Result<SmtpTransport> {
        let server = self.settings.host.as_str();

        let mut transport = match self.settings.security {
            SmtpSecurity::Tls => SmtpTransport::relay(server)?,
            SmtpSecurity::Starttls => SmtpTransport::starttls_relay(server)?,
            SmtpSecurity::None => SmtpTransport::builder_dangerous(server),
        }
        .port(self.settings.effective_port());

        if let Some(ref auth) = self.settings.auth {
            transport = transport.credentials(Credentials::new(auth.user.clone(), auth.pass.clone()));
        }

        if let Some(seconds) = self.settings.timeout_seconds {
            transport = transport.timeout(Some(Duration::from_secs(seconds)));
        }

        Ok(transport.build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = self.build_message(mail)?;
        let transport = self.get_transport()?;

        // Send email (blocking operation, run in blocking task)
        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| WatchError::notification(format!("Mail task failed: {}", e)))??;

        tracing::debug!(
            "SMTP server accepted message: {} {}",
            response.code(),
            response.message().collect::<Vec<_>>().join(" ")
        );

        Ok(())
    }

    fn transport_name(&self) -> &str {
        "smtp"
    }

    async fn test_connection(&self) -> Result<()> {
        let transport = self.get_transport()?;

        let connected = tokio::task::spawn_blocking(move || transport.test_connection())
            .await
            .map_err(|e| WatchError::notification(format!("Mail task failed: {}", e)))??;

        if !connected {
            return Err(WatchError::notification(format!(
                "SMTP server {}:{} did not accept the connection",
                self.settings.host,
                self.settings.effective_port()
            )));
        }

        Ok(())
    }
}
