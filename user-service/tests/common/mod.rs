//! Test helpers: spawn the real application on a random port.

#![allow(dead_code)]

use service_core::config::Config as CoreConfig;
use user_service::config::UserServiceConfig;
use user_service::startup::Application;
use user_service::AppState;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub state: AppState,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = UserServiceConfig {
            common: CoreConfig { port: 0 },
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let state = app.state().clone();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
            state,
            client: reqwest::Client::new(),
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
