pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{AccountService, CateringService, MenuService, ServiceError, ServiceSettings};
pub use crypto::TokenIssuer;
pub use infra::{AppConfig, Mailer, RecordingMailer, SmtpMailer};
pub use storage::{MemoryStore, MenuStore, PgStore, UserStore};
