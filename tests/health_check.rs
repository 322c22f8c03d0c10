//! Integration tests for the readiness probe and the admin surface.

use chirpy::configuration::{get_configuration, DatabaseSettings};
use chirpy::startup::run;
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

async fn spawn_app_with_platform(platform: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    configuration.application.platform = platform.to_string();
    let connection_pool = configure_database(&configuration.database).await;

    let server = run(
        listener,
        connection_pool.clone(),
        configuration.jwt.clone(),
        configuration.application.clone(),
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
    }
}

async fn spawn_app() -> TestApp {
    spawn_app_with_platform("dev").await
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");
    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(&format!("{}/api/healthz", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn metrics_page_counts_fileserver_hits() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let before = client
        .get(&format!("{}/admin/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(before.text().await.unwrap().contains("visited 0 times"));

    for _ in 0..3 {
        let response = client
            .get(&format!("{}/app/", app.address))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
    }

    let after = client
        .get(&format!("{}/admin/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(after.text().await.unwrap().contains("visited 3 times"));
}

#[tokio::test]
async fn reset_clears_users_on_dev_platform() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/users", app.address))
        .json(&serde_json::json!({"email": "gone@example.com", "password": "pw123"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(201, response.status().as_u16());

    let response = client
        .post(&format!("{}/admin/reset", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(200, response.status().as_u16());

    let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to count users");
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn reset_returns_403_outside_dev_platform() {
    let app = spawn_app_with_platform("prod").await;

    let response = reqwest::Client::new()
        .post(&format!("{}/admin/reset", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(403, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "FORBIDDEN");
}
