//! User Service - an in-memory user directory behind a small JSON API.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use services::UserRepository;
use std::sync::Arc;

/// Name reported by the health endpoint and attached to exported spans.
pub const SERVICE_NAME: &str = "ExampleAppFoundry";

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserRepository>,
}

impl AppState {
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self { users }
    }
}
