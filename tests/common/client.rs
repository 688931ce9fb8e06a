//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint. When API routes or
//! request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client after registering the default test account.
    ///
    /// # Panics
    ///
    /// Panics if registration fails (indicates test infrastructure problem).
    pub async fn with_test_account(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client
            .register(TEST_USER_EMAIL, TEST_USER_NAME, TEST_USER_PASS)
            .await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Test account registration failed: {:?}",
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Response {
        self.client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .expect("GET request failed")
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub async fn register(&self, email: &str, display_name: &str, password: &str) -> Response {
        self.client
            .post(self.url("/v1/auth/register"))
            .json(&json!({
                "email": email,
                "display_name": display_name,
                "password": password,
            }))
            .send()
            .await
            .expect("Register request failed")
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Login request failed")
    }

    pub async fn list_users(&self) -> Response {
        self.get("/v1/users", &[]).await
    }

    pub async fn get_user(&self, email: &str) -> Response {
        self.get(&format!("/v1/users/{}", email), &[]).await
    }

    pub async fn update_user(&self, email: &str, body: serde_json::Value) -> Response {
        self.client
            .put(self.url(&format!("/v1/users/{}", email)))
            .json(&body)
            .send()
            .await
            .expect("Update user request failed")
    }

    pub async fn delete_user(&self, email: &str) -> Response {
        self.client
            .delete(self.url(&format!("/v1/users/{}", email)))
            .send()
            .await
            .expect("Delete user request failed")
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.get("/", &[]).await
    }

    pub async fn get_all_tracks(&self) -> Response {
        self.get("/v1/tracks/all", &[]).await
    }

    pub async fn get_track(&self, id: &str) -> Response {
        self.get(&format!("/v1/tracks/{}", id), &[]).await
    }

    /// `params` are passed through as query parameters, e.g. `("artist", "Queen")`.
    pub async fn search_tracks(&self, params: &[(&str, &str)]) -> Response {
        let query: Vec<(&str, String)> =
            params.iter().map(|(k, v)| (*k, v.to_string())).collect();
        self.get("/v1/tracks/unsubscribed", &query).await
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub async fn add_favorite(&self, email: &str, track_id: &str) -> Response {
        self.client
            .post(self.url("/v1/favorites"))
            .json(&json!({ "user_email": email, "track_id": track_id }))
            .send()
            .await
            .expect("Add favorite request failed")
    }

    pub async fn remove_favorite(&self, email: &str, track_id: &str) -> Response {
        self.client
            .delete(self.url("/v1/favorites"))
            .query(&[("user_email", email), ("track_id", track_id)])
            .send()
            .await
            .expect("Remove favorite request failed")
    }

    pub async fn is_favorite(&self, email: &str, track_id: &str) -> Response {
        self.get(
            &format!("/v1/favorites/{}", track_id),
            &[("user_email", email.to_string())],
        )
        .await
    }

    pub async fn list_favorites(&self, email: &str, page: usize, per_page: usize) -> Response {
        self.get(
            "/v1/favorites",
            &[
                ("user_email", email.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        )
        .await
    }

    pub async fn search_favorites(&self, email: &str, params: &[(&str, &str)]) -> Response {
        let mut query = vec![("user_email", email.to_string())];
        query.extend(params.iter().map(|(k, v)| (*k, v.to_string())));
        self.get("/v1/favorites/search", &query).await
    }
}
