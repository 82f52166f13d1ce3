pub mod metrics;
pub mod user_repository;

pub use self::metrics::{get_metrics, init_metrics};
pub use user_repository::UserRepository;
