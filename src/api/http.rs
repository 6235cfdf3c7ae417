//! reqwest implementation of [`TicketApi`].
//!
//! # Security Note - Logging
//!
//! The bearer token is kept in a `SecretBox` and handed to reqwest as a
//! sensitive header value, so it is redacted from reqwest's debug output.
//! Request logging in this module records method and path only.

use std::fmt;

use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretBox};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::types::{MessagePage, Setting, Ticket, TicketPage};

use super::{ApiError, OutgoingMessage, TicketApi, TicketQuery, TicketUpdate};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Bearer token that never prints its value
struct BearerToken(SecretBox<String>);

impl BearerToken {
    fn new(token: String) -> Self {
        Self(SecretBox::new(Box::new(token)))
    }

    fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0.expose_secret()))
            .map_err(|_| DeskError::Auth("API token contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Helpdesk API over HTTP
#[derive(Debug)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Option<BearerToken>,
}

impl HttpApi {
    /// Create a client from configuration
    ///
    /// Uses the configured total timeout and a 10s connect timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.api_base_url().ok_or_else(|| {
            DeskError::Config(
                "API URL not configured. Set DESKBOX_API_URL environment variable or run: deskbox config set api.base_url <url>".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        let mut api = Self::with_client(client, &base_url)?;
        api.token = config.api_token().map(BearerToken::new);
        Ok(api)
    }

    /// Create a client for `base_url` with default settings and no token
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(BearerToken::new(token.into()));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(%method, path, "helpdesk request");

        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, token.header_value()?);
        }
        Ok(builder)
    }

    /// Send a request and turn non-2xx answers into [`ApiError`]
    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status, &body).into())
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = Self::send(builder).await?;
        Ok(response.json::<T>().await?)
    }
}

impl TicketApi for HttpApi {
    async fn update_ticket(&self, id: u64, update: &TicketUpdate) -> Result<Ticket> {
        let builder = self
            .request(Method::PUT, &format!("tickets/{id}"))?
            .json(update);
        Self::send_json(builder).await
    }

    async fn list_settings(&self) -> Result<Vec<Setting>> {
        Self::send_json(self.request(Method::GET, "settings")?).await
    }

    async fn send_message(&self, ticket_id: u64, message: &OutgoingMessage) -> Result<()> {
        let builder = self
            .request(Method::POST, &format!("messages/{ticket_id}"))?
            .json(message);
        Self::send(builder).await?;
        Ok(())
    }

    async fn list_tickets(&self, query: &TicketQuery) -> Result<TicketPage> {
        let builder = self
            .request(Method::GET, "tickets")?
            .query(&query.to_pairs());
        Self::send_json(builder).await
    }

    async fn get_ticket(&self, id: u64) -> Result<Ticket> {
        let builder = self.request(Method::GET, &format!("tickets/{id}"))?;
        match Self::send_json(builder).await {
            Err(DeskError::Api { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(DeskError::TicketNotFound(id))
            }
            other => other,
        }
    }

    async fn list_messages(&self, ticket_id: u64) -> Result<MessagePage> {
        Self::send_json(self.request(Method::GET, &format!("messages/{ticket_id}"))?).await
    }
}
