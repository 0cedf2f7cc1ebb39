//! Domain types: accounts, menu, catering.

pub mod catering;
pub mod menu;
pub mod user;
pub mod validation;
pub mod verification;

pub use catering::CateringInquiry;
pub use menu::MenuItem;
pub use user::{AccountType, NewUser, PublicUser, UserAccount};
