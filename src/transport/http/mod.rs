pub mod auth;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod auth;
    pub mod catering;
    pub mod common;
    pub mod health;
    pub mod menu;
}

pub use router::{create_app, create_router, ApiDoc};
pub use types::AppState;
