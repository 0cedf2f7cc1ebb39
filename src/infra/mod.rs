pub mod config;
pub mod mailer;
pub mod telemetry;

pub use config::{AppConfig, LogFormat, SmtpSettings};
pub use mailer::{Mailer, OutgoingMail, RecordingMailer, SmtpMailer};
