use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use tokio::task::JoinHandle;
use worklog::build_router;
use worklog::config::{ClientConfig, Config, LogFormat, StoreBackend};
use worklog::repositories::InMemoryRepository;
use worklog::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        store_backend: StoreBackend::Database,
        // One pooled connection so every query sees the same in-memory database
        database_url: Some("sqlite::memory:".to_string()),
        database_max_connections: 1,
        database_min_connections: 1,
        seed_sample_data: false,
        host: "127.0.0.1".to_string(),
        port: 0,
        log_format: LogFormat::Pretty,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application over in-memory SQLite
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let state = AppState::new(config)
            .await
            .expect("Failed to create test app state");

        Self::from_state(state)
    }

    /// Create a test application over the in-memory repository
    pub async fn in_memory() -> Self {
        let mut config = test_config();
        config.store_backend = StoreBackend::Memory;
        config.database_url = None;

        let state = AppState::with_repository(config, Arc::new(InMemoryRepository::new()))
            .await
            .expect("Failed to create test app state");

        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }
}

/// The router served on a real socket, for tests that go through reqwest
pub struct LiveServer {
    pub state: AppState,
    pub base_url: String,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl LiveServer {
    pub async fn start() -> Self {
        let state = AppState::new(test_config())
            .await
            .expect("Failed to create test app state");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let router = build_router(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
