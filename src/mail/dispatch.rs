//! Delivery of booking notifications through an SMTP relay.
//!
//! # Responsibilities
//! - Turn a validated booking into a `multipart/alternative` message
//! - Address it from and to the fixed contact mailboxes, replying to the requester
//! - Hand it to a `MailTransport` and report the outcome
//!
//! # Design Decisions
//! - The transport sits behind a trait so the router can run against a fake
//! - Port 465 uses implicit TLS, every other port upgrades via STARTTLS when offered
//! - A requester address lettre cannot represent drops `Reply-To`, not the booking
//! - Errors carry the reason for server-side logs only, never for clients

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::booking::BookingRequest;
use crate::config::{ContactConfig, MailConfig, SmtpConfig};
use crate::mail::compose::compose;

/// Failures while preparing or sending a message.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid {field} address: {reason}")]
    InvalidAddress { field: &'static str, reason: String },

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// Something that can deliver a fully built message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<(), DispatchError>;
}

/// Production transport backed by a pooled lettre SMTP client.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    /// Build the client. No connection is opened until the first delivery.
    ///
    /// Must be called inside a Tokio runtime: the connection pool spawns its
    /// idle-connection reaper here.
    pub fn new(config: &SmtpConfig) -> Result<Self, DispatchError> {
        let tls = tls_mode(config)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(config.user.clone(), config.password.clone()))
            .build();

        Ok(Self { transport })
    }
}

/// Implicit TLS on the SMTPS port, opportunistic STARTTLS elsewhere.
fn tls_mode(config: &SmtpConfig) -> Result<Tls, DispatchError> {
    let parameters = TlsParameters::new(config.host.clone())
        .map_err(|e| DispatchError::Tls(e.to_string()))?;
    Ok(if config.implicit_tls() {
        Tls::Wrapper(parameters)
    } else {
        Tls::Opportunistic(parameters)
    })
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn deliver(&self, message: Message) -> Result<(), DispatchError> {
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| DispatchError::Transport(e.to_string()))
    }
}

/// Sends booking notifications from the fixed sender to the fixed recipient.
pub struct Dispatcher {
    from: Mailbox,
    to: Mailbox,
    transport: Arc<dyn MailTransport>,
}

impl Dispatcher {
    /// Create a dispatcher over an arbitrary transport.
    pub fn new(
        contact: &ContactConfig,
        transport: Arc<dyn MailTransport>,
    ) -> Result<Self, DispatchError> {
        Ok(Self {
            from: parse_mailbox("CONTACT_FROM", &contact.from)?,
            to: parse_mailbox("CONTACT_TO", &contact.to)?,
            transport,
        })
    }

    /// Create a dispatcher that delivers through the configured SMTP relay.
    pub fn smtp(config: &MailConfig) -> Result<Self, DispatchError> {
        let relay = SmtpRelay::new(&config.smtp)?;
        tracing::info!(
            smtp_host = %config.smtp.host,
            smtp_port = config.smtp.port,
            implicit_tls = config.smtp.implicit_tls(),
            "SMTP relay configured"
        );
        Self::new(&config.contact, Arc::new(relay))
    }

    /// Build the notification message for a booking.
    ///
    /// The requester's address passed validation but may still be outside
    /// what RFC 5322 mailboxes allow; such bookings go out without `Reply-To`.
    pub fn build_message(&self, booking: &BookingRequest) -> Result<Message, DispatchError> {
        let mail = compose(booking);

        let mut builder = Message::builder().from(self.from.clone()).to(self.to.clone());
        match booking.email.parse::<Mailbox>() {
            Ok(reply_to) => builder = builder.reply_to(reply_to),
            Err(e) => tracing::warn!(
                email = %booking.email,
                error = %e,
                "Requester address not representable; sending without Reply-To"
            ),
        }

        builder
            .subject(mail.subject)
            .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
            .map_err(|e| DispatchError::Build(e.to_string()))
    }

    /// Compose and deliver one booking. Runs to completion; no retry.
    pub async fn dispatch(&self, booking: &BookingRequest) -> Result<(), DispatchError> {
        let message = self.build_message(booking)?;
        self.transport.deliver(message).await
    }
}

fn parse_mailbox(field: &'static str, raw: &str) -> Result<Mailbox, DispatchError> {
    raw.trim()
        .parse()
        .map_err(|e: lettre::address::AddressError| DispatchError::InvalidAddress {
            field,
            reason: e.to_string(),
        })
}
