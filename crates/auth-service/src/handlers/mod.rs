//! HTTP request handlers.

pub mod auth_handler;
pub mod health;
pub mod metrics;
pub mod user_handler;

pub use auth_handler::{login, signup};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use user_handler::{all_users, authenticated_user};
