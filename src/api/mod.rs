//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod keys;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use middleware::RequireApiKey;
pub use router::{create_router, RouterMode};
pub use state::AppState;
