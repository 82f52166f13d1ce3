//! HTTP handlers for user-service.

pub mod health;
pub mod metrics;
pub mod users;

pub use health::health_check;
pub use self::metrics::metrics_endpoint;
pub use users::{create_user, get_user, list_users};
