//! Contact form mail over SMTP via lettre.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::MailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A contact form submission to forward.
#[derive(Debug, Clone)]
pub struct ContactMail<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: Option<&'a str>,
    pub message: &'a str,
}

impl ContactMail<'_> {
    fn subject_line(&self) -> String {
        match self.subject.map(str::trim).filter(|s| !s.is_empty()) {
            Some(subject) => format!("[Lumiere] {subject}"),
            None => format!("[Lumiere] Message from {}", self.name),
        }
    }

    fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\n\n{}\n",
            self.name, self.email, self.message
        )
    }
}

/// Sends contact mail to the shop inbox.
#[derive(Clone)]
pub struct Mailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    /// Create a mailer from configuration.
    ///
    /// No connection is made until the first message is sent.
    ///
    /// # Errors
    ///
    /// Returns error if the relay or an address is invalid.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from: parse_mailbox(&config.from_address)?,
            to: parse_mailbox(&config.to_address)?,
        })
    }

    /// Forward a contact form submission. Replies go to the customer.
    ///
    /// # Errors
    ///
    /// Returns error if the customer address is invalid or delivery fails.
    pub async fn send_contact(&self, mail: &ContactMail<'_>) -> Result<(), MailError> {
        let reply_to = Mailbox::new(Some(mail.name.to_string()), mail.email.parse().map_err(|_| {
            MailError::InvalidAddress(mail.email.to_string())
        })?);

        let subject = mail.subject_line();
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(&subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body())?;

        self.mailer.send(message).await?;

        tracing::info!(to = %self.to, subject = %subject, "Contact mail sent");
        Ok(())
    }
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("from", &self.from.to_string())
            .field("to", &self.to.to_string())
            .finish_non_exhaustive()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}
