#![allow(dead_code)]

use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use user_service::config::{MongoConfig, StoreBackend, StoreConfig, UserConfig};
use user_service::services::{MongoUserStore, UserStore};
use user_service::startup::Application;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub store: Arc<dyn UserStore>,
    mongo: Option<MongoUserStore>,
}

fn test_config(backend: StoreBackend, database: String) -> UserConfig {
    UserConfig {
        // Random port for testing
        common: CoreConfig {
            port: 0,
            ..CoreConfig::default()
        },
        store: StoreConfig {
            backend,
            timeout_secs: 10,
        },
        mongodb: MongoConfig {
            uri: Some(
                std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            database,
            collection: "users".to_string(),
        },
    }
}

impl TestApp {
    /// Spawn the service on a random port backed by the in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(StoreBackend::Memory, "unused".to_string()), None).await
    }

    /// Spawn the service against MongoDB, in a database of its own.
    pub async fn spawn_with_mongo() -> Self {
        let config = test_config(
            StoreBackend::Mongodb,
            format!("user_test_{}", uuid::Uuid::new_v4().simple()),
        );
        let mongo = MongoUserStore::connect(
            config.mongodb.uri.as_deref().expect("test uri is set"),
            &config.mongodb.database,
            &config.mongodb.collection,
        )
        .await
        .expect("Failed to connect to MongoDB");

        Self::spawn_with(config, Some(mongo)).await
    }

    async fn spawn_with(config: UserConfig, mongo: Option<MongoUserStore>) -> Self {
        let app = match &mongo {
            Some(store) => Application::build_with_store(config, Arc::new(store.clone())).await,
            None => Application::build(config).await,
        }
        .expect("Failed to build test application");

        let port = app.port();
        let store = app.store();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            store,
            mongo,
        }
    }

    pub async fn create_user(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/user", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a user and return its id.
    pub async fn create_user_id(&self, body: &Value) -> String {
        let response = self.create_user(body).await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"]["data"]["insertedId"]
            .as_str()
            .expect("insertedId missing")
            .to_string()
    }

    pub async fn get_user(&self, id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/user/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn edit_user(&self, id: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(format!("{}/user/{}", self.address, id))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_user(&self, id: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}/user/{}", self.address, id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_all_users(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/users", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Drop the per-test database when running against MongoDB.
    pub async fn cleanup(&self) {
        if let Some(mongo) = &self.mongo {
            let _ = mongo.database().drop(None).await;
        }
    }
}

pub fn user_body(name: &str) -> Value {
    json!({
        "name": name,
        "dob": "12 Dec 2002",
        "address": "8194 Queens",
        "description": "Developer"
    })
}
