//! Service layer: the operations behind each HTTP route.

pub mod account_service;
pub mod catering_service;
pub mod error;
pub mod menu_service;

pub use account_service::{AccountService, Session, SignupInput};
pub use catering_service::CateringService;
pub use error::ServiceError;
pub use menu_service::MenuService;

/// Knobs the services need beyond their stores and mailer.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub bcrypt_cost: u32,
    /// Where catering inquiries are delivered; `None` disables intake.
    pub catering_inbox: Option<String>,
}
