//! Outbound mail through the SMTP relay, plus the few messages the service sends.

use crate::domain::CateringInquiry;
use crate::infra::config::SmtpSettings;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()>;
}

/// STARTTLS relay client (port 587 by default).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> anyhow::Result<Self> {
        let from = settings
            .from
            .as_deref()
            .ok_or_else(|| anyhow!("SMTP_FROM or SMTP_USER must be set to send mail"))?
            .parse::<Mailbox>()
            .context("SMTP sender is not a valid address")?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .with_context(|| format!("invalid SMTP host '{}'", settings.host))?
            .port(settings.port);
        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Opens a connection and issues NOOP; used by the preflight check.
    pub async fn test_connection(&self) -> anyhow::Result<bool> {
        Ok(self.transport.test_connection().await?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient '{}'", mail.to))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)?;
        self.transport
            .send(message)
            .await
            .context("SMTP relay rejected the message")?;
        debug!(to = %mail.to, "mail handed to relay");
        Ok(())
    }
}

/// Keeps every message in memory instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every `send` fails as if the relay were down.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().await.clone()
    }

    pub async fn last_to(&self, to: &str) -> Option<OutgoingMail> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.to == to)
            .cloned()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("relay unavailable"));
        }
        self.sent.lock().await.push(mail);
        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn code_mail(
    to: &str,
    subject: &str,
    heading: &str,
    intro: &str,
    name: &str,
    code: &str,
) -> OutgoingMail {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #333;">{heading}</h2>
    <p>Hi {name},</p>
    <p>{intro}</p>
    <div style="background: #f4f4f4; padding: 20px; text-align: center; margin: 20px 0;">
        <h1 style="color: #667eea; font-size: 32px;">{code}</h1>
    </div>
</div>"#,
        heading = heading,
        name = escape_html(name),
        intro = intro,
        code = code,
    );
    OutgoingMail {
        to: to.to_string(),
        subject: subject.to_string(),
        html,
    }
}

pub fn verification_mail(to: &str, name: &str, code: &str) -> OutgoingMail {
    code_mail(
        to,
        "Verify Your Taqueria Account",
        "Welcome to Taqueria Cinco de Mayo!",
        "Please verify your email with the code below:",
        name,
        code,
    )
}

pub fn resend_mail(to: &str, name: &str, code: &str) -> OutgoingMail {
    code_mail(
        to,
        "Your New Verification Code",
        "Verification Code Resent",
        "Your new code:",
        name,
        code,
    )
}

pub fn catering_mail(inbox: &str, inquiry: &CateringInquiry) -> OutgoingMail {
    let rows: String = inquiry
        .fields()
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| {
            format!(
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>",
                label,
                escape_html(value.trim())
            )
        })
        .collect();
    OutgoingMail {
        to: inbox.to_string(),
        subject: format!(
            "Catering inquiry: {} on {}",
            inquiry.event_type.trim(),
            inquiry.event_date.trim()
        ),
        html: format!(
            "<div style=\"font-family: Arial, sans-serif;\"><h2>New catering inquiry</h2><table>{}</table></div>",
            rows
        ),
    }
}
