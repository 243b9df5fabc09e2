#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use placelog::config::MapConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory SQLite pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Self::with_pool(pool).await
    }

    /// Build a fresh app over an existing database, as a restart would.
    pub async fn with_pool(pool: SqlitePool) -> Self {
        let router = placelog::build_app(pool.clone(), MapConfig::default()).await;
        Self { router, db: pool }
    }

    /// Send a request through the app and return the response.
    pub async fn request(&self, req: Request<Body>) -> Response {
        tower::ServiceExt::oneshot(self.router.clone(), req)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(req).await
    }

    /// Send a POST form request.
    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        let req = Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(req).await
    }

    /// Report a browser position so the map is ready.
    pub async fn locate(&self, lat: f64, lng: f64) {
        let resp = self.post_form("/position", &format!("lat={lat}&lng={lng}")).await;
        assert_redirect(&resp, "/");
    }

    pub async fn click_map(&self, lat: f64, lng: f64) {
        let resp = self.post_form("/map/click", &format!("lat={lat}&lng={lng}")).await;
        assert_redirect(&resp, "/");
    }

    /// Locate, click, and submit a cafe visit.
    pub async fn add_cafe(&self, name: &str, time_spent: &str, rating: &str) -> Response {
        self.click_map(51.5, -0.1).await;
        let body = format!("type=cafe&place_name={name}&time_spent={time_spent}&rating={rating}&activities=");
        self.post_form("/visits", &body).await
    }

    pub async fn add_park(&self, name: &str, time_spent: &str, activities: &str) -> Response {
        self.click_map(51.507, -0.165).await;
        let body = format!("type=park&place_name={name}&time_spent={time_spent}&rating=&activities={activities}");
        self.post_form("/visits", &body).await
    }

    /// The raw JSON stored under the `visits` key.
    pub async fn stored(&self) -> Option<serde_json::Value> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = 'visits'")
            .fetch_optional(&self.db)
            .await
            .unwrap();
        row.map(|(value,)| serde_json::from_str(&value).unwrap())
    }

    pub async fn page(&self) -> String {
        let resp = self.get("/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        body_string(resp).await
    }
}

/// Read the full response body as a String.
pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert that a response is a redirect to the given location.
pub fn assert_redirect(resp: &Response, expected_location: &str) {
    assert!(
        resp.status().is_redirection(),
        "Expected redirect, got {}",
        resp.status()
    );
    let location = resp
        .headers()
        .get("location")
        .expect("Redirect should have location header")
        .to_str()
        .unwrap();
    assert_eq!(location, expected_location);
}

/// Month name and day of today, as visit descriptions print them.
pub fn today() -> String {
    chrono::Local::now().format("%B %-d").to_string()
}
