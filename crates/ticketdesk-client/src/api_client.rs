//! HTTP client for communicating with the ticketing API

use crate::api::TicketApi;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use ticketdesk_core::config::ApiConfig;
use ticketdesk_core::types::ClassifyRequest;
use ticketdesk_core::{
    ClassifyResponse, Error, Result, Ticket, TicketCreatePayload, TicketFilters, TicketId,
    TicketStats, TicketUpdatePayload,
};
use tracing::debug;
use validator::Validate;

const TICKETS_PATH: &str = "/api/tickets/";
const CLASSIFY_PATH: &str = "/api/tickets/classify/";
const STATS_PATH: &str = "/api/tickets/stats/";

/// API client for making HTTP requests to the ticketing API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with reqwest defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client from configuration, applying the request timeout
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    /// Base URL requests are issued against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path and query for a ticket listing
    #[must_use]
    pub fn tickets_path(filters: &TicketFilters) -> String {
        let query = filters.query_string();
        if query.is_empty() {
            TICKETS_PATH.to_string()
        } else {
            format!("{TICKETS_PATH}?{query}")
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "issuing API request");

        self.client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send a request and decode the JSON body of a 2xx response
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| Error::Transport {
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| Error::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TicketApi for ApiClient {
    async fn fetch_tickets(&self, filters: &TicketFilters) -> Result<Vec<Ticket>> {
        let request = self.request(Method::GET, &Self::tickets_path(filters));
        self.send(request).await
    }

    async fn create_ticket(&self, payload: &TicketCreatePayload) -> Result<Ticket> {
        payload.validate()?;

        let request = self.request(Method::POST, TICKETS_PATH).json(payload);
        self.send(request).await
    }

    async fn update_ticket(&self, id: TicketId, payload: &TicketUpdatePayload) -> Result<Ticket> {
        let path = format!("{TICKETS_PATH}{id}/");
        let request = self.request(Method::PATCH, &path).json(payload);
        self.send(request).await
    }

    async fn classify_ticket(&self, description: &str) -> Result<ClassifyResponse> {
        let request = self
            .request(Method::POST, CLASSIFY_PATH)
            .json(&ClassifyRequest { description });
        self.send(request).await
    }

    async fn fetch_stats(&self) -> Result<TicketStats> {
        let request = self.request(Method::GET, STATS_PATH);
        self.send(request).await
    }
}

fn normalize_base_url(base_url: String) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.len() == base_url.len() {
        base_url
    } else {
        trimmed.to_string()
    }
}
