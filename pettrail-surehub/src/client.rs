//! Authenticated client for the SurePetcare cloud API.
//!
//! The API is a conventional bearer-token REST surface: a login call
//! exchanges credentials for a token, and every later call presents it.
//! All responses wrap their payload in a `{"data": ...}` envelope.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pettrail_surehub::SurehubClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = SurehubClient::builder()
//!         .credentials("me@example.com", "hunter2")
//!         .build();
//!
//!     client.login().await?;
//!
//!     for pet in client.pets().await? {
//!         println!("{}: {:?}", pet.id, pet.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::report::AggregateReport;
use crate::SurehubError;

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://app.api.surehub.io";

/// Static client identifier sent with the login call. This names the API
/// client, not a pet device.
pub const DEFAULT_LOGIN_DEVICE_ID: &str = "0123456789";

/// Client for the SurePetcare cloud API.
#[derive(Debug, Clone)]
pub struct SurehubClient {
    client: Client,
    endpoint: String,
    email: String,
    password: String,
    login_device_id: String,
    token: Option<String>,
}

impl SurehubClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> SurehubClientBuilder {
        SurehubClientBuilder::default()
    }

    /// Exchange the configured credentials for a bearer token.
    ///
    /// Must succeed before any data call; the token is held for the rest of
    /// the client's life.
    pub async fn login(&mut self) -> Result<(), SurehubError> {
        let url = format!("{}/api/auth/login", self.endpoint);
        let payload = json!({
            "email_address": self.email,
            "password": self.password,
            "device_id": self.login_device_id,
        });

        let response = self.client.post(&url).json(&payload).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SurehubError::Auth("Invalid credentials".to_string()));
        }

        if !response.status().is_success() {
            return Err(SurehubError::Http(format!(
                "Login returned status {}",
                response.status()
            )));
        }

        let envelope: Envelope<LoginData> = response
            .json()
            .await
            .map_err(|e| SurehubError::Parse(e.to_string()))?;

        self.token = Some(envelope.data.token);
        Ok(())
    }

    /// List all pets visible to the account.
    pub async fn pets(&self) -> Result<Vec<Pet>, SurehubError> {
        self.get("/api/pet", &[]).await
    }

    /// Fetch the aggregate activity report for one pet over a date range.
    ///
    /// The payload is a map from activity-category name to a section value;
    /// it is deliberately left loosely typed because downstream
    /// normalization must tolerate per-record shape anomalies without
    /// rejecting the sibling records in the same response.
    pub async fn aggregate_report(
        &self,
        household_id: i64,
        pet_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AggregateReport, SurehubError> {
        let path = format!(
            "/api/report/household/{}/pet/{}/aggregate",
            household_id, pet_id
        );
        self.get(&path, &[("from", from.to_string()), ("to", to.to_string())])
            .await
    }

    /// Fetch one page of the notification feed. Pages are 1-indexed; an
    /// empty page means the feed is exhausted.
    pub async fn notifications(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Notification>, SurehubError> {
        self.get(
            "/api/notification",
            &[("page", page.to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    fn bearer(&self) -> Result<&str, SurehubError> {
        self.token
            .as_deref()
            .ok_or_else(|| SurehubError::Auth("No session; call login() first".to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SurehubError> {
        let url = format!("{}{}", self.endpoint, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.bearer()?)
            .query(query)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SurehubError::Auth(format!(
                "Token rejected for {}",
                path
            )));
        }

        if !response.status().is_success() {
            return Err(SurehubError::Http(format!(
                "API returned status {} for {}",
                response.status(),
                path
            )));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| SurehubError::Parse(e.to_string()))?;

        Ok(envelope.data)
    }
}

/// Builder for [`SurehubClient`].
#[derive(Debug, Default)]
pub struct SurehubClientBuilder {
    endpoint: Option<String>,
    email: Option<String>,
    password: Option<String>,
    login_device_id: Option<String>,
    timeout: Option<Duration>,
}

impl SurehubClientBuilder {
    /// Set the API endpoint (default: [`DEFAULT_ENDPOINT`]).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the account credentials.
    pub fn credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    /// Set the client identifier sent with the login call
    /// (default: [`DEFAULT_LOGIN_DEVICE_ID`]).
    pub fn login_device_id(mut self, id: impl Into<String>) -> Self {
        self.login_device_id = Some(id.into());
        self
    }

    /// Set the request timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> SurehubClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        SurehubClient {
            client,
            endpoint: self
                .endpoint
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            login_device_id: self
                .login_device_id
                .unwrap_or_else(|| DEFAULT_LOGIN_DEVICE_ID.to_string()),
            token: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

/// A pet record from the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Pet {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub household_id: i64,
}

/// A raw record from the notification feed.
///
/// Every field is tolerant of absence: one malformed alert in a page must
/// not reject its siblings.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Category code; `34` marks water dispensed/removed.
    #[serde(rename = "type", default)]
    pub kind: Option<i64>,

    /// Human-readable alert body.
    #[serde(default)]
    pub text: String,

    /// Creation time as reported by the feed.
    #[serde(default)]
    pub created_at: Option<String>,
}
