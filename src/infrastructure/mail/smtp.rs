use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info};

use crate::{errors::DeliveryError, settings::MailConfig};

/// Relays a plain-text notification to the site owner.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// Opens one SMTP session per notification and makes a single send attempt.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    config: MailConfig,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Self {
        SmtpNotifier { config }
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message, DeliveryError> {
        let from: Mailbox = self.config.username.parse()?;
        let to: Mailbox = self.config.recipient.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        Ok(message)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.to_string(),
        );

        let builder = if self.config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.server)
        };

        Ok(builder
            .port(self.config.port)
            .credentials(credentials)
            .build())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[tracing::instrument(name = "smtp_notify", skip_all, fields(server = %self.config.server, port = self.config.port))]
    async fn notify(&self, subject: &str, body: &str) -> Result<(), DeliveryError> {
        if !self.config.is_complete() {
            error!("Email configuration is incomplete. Check MAIL_* environment variables.");
            return Err(DeliveryError::NotConfigured);
        }

        let result = async {
            let message = self.build_message(subject, body)?;
            let mailer = self.transport()?;
            mailer.send(message).await?;
            Ok::<_, DeliveryError>(())
        }
        .await;

        match &result {
            Ok(()) => info!(to = %self.config.recipient, "Notification email sent"),
            Err(e) => error!(error = %e, "Email sending failed"),
        }
        result
    }
}
