use secrecy::Secret;
use spends_frontend::config::{
    ApiSettings, DashboardSettings, DictionarySettings, ServerSettings, Settings,
    TelemetrySettings,
};
use spends_frontend::services::ApiClient;
use spends_frontend::startup::build_router;
use spends_frontend::AppState;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

pub struct TestApp {
    pub address: String,
    pub backend: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;

        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            api: ApiSettings {
                base_url: backend.uri(),
                auth_token: Some(Secret::new(TEST_TOKEN.to_string())),
                timeout_seconds: 5,
            },
            dashboard: DashboardSettings::default(),
            dictionaries: DictionarySettings::default(),
            telemetry: TelemetrySettings::default(),
        };

        spends_frontend::services::metrics::init_metrics();

        let api = ApiClient::new(&settings.api).expect("Failed to build backend client");
        let state = AppState::new(Arc::new(api), &settings);
        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local address").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let address = format!("http://127.0.0.1:{}", port);
        let client = reqwest::Client::new();

        // Wait for the server to accept connections
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Self {
            address,
            backend,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

/// Backend request record with the given status and amount.
pub fn backend_request(id: &str, status: &str, amount: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "number": "REQ-001",
        "title": "Office supplies",
        "status": status,
        "created_by_user_id": "executor-1",
        "counterparty_id": "cp-1",
        "currency_code": "KZT",
        "amount_total": amount,
        "vat_total": 0,
        "due_date": "2026-11-30",
        "created_at": "2026-10-01T09:00:00Z",
        "updated_at": "2026-10-01T09:00:00Z"
    })
}
