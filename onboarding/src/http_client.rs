//! Thin JSON-over-HTTP transport shared by the payment backend client and the
//! routing-number lookup.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::util::{ClientError, Result};

/// Response body the caller does not interpret. The backend answers some
/// POSTs with JSON and others with a bare text body; both land here.
pub type OpaquePayload = Value;

pub type QueryParams<'a> = [(&'a str, String)];

#[derive(Clone)]
pub struct ApiHttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiHttpClient {
    pub fn new(base_url: &str, request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|err| {
                log::warn!("http client builder failed, using defaults without timeouts: {}", err);
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(
            &config.base_url,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub async fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryParams<'_>,
    ) -> Result<R> {
        let url = self.url(endpoint);
        log::debug!("GET {} {:?}", url, query);

        let body = self.send(self.client.get(&url).query(query), &url).await?;
        decode(&url, &body)
    }

    pub async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryParams<'_>,
        request: &T,
    ) -> Result<R> {
        let url = self.url(endpoint);
        log::debug!("POST {} {:?}", url, query);

        let builder = self.client.post(&url).query(query).json(request);
        let body = self.send(builder, &url).await?;
        decode(&url, &body)
    }

    pub async fn post_query<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &QueryParams<'_>,
    ) -> Result<R> {
        let url = self.url(endpoint);
        log::debug!("POST {} {:?}", url, query);

        let body = self.send(self.client.post(&url).query(query), &url).await?;
        decode(&url, &body)
    }

    pub async fn post_json_payload<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        request: &T,
    ) -> Result<OpaquePayload> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);

        let body = self.send(self.client.post(&url).json(request), &url).await?;
        Ok(lenient_payload(body))
    }

    pub async fn post_query_payload(
        &self,
        endpoint: &str,
        query: &QueryParams<'_>,
    ) -> Result<OpaquePayload> {
        let url = self.url(endpoint);
        log::debug!("POST {} {:?}", url, query);

        let body = self.send(self.client.post(&url).query(query), &url).await?;
        Ok(lenient_payload(body))
    }

    /// Send the request and return the body of a successful response.
    async fn send(&self, builder: RequestBuilder, url: &str) -> Result<String> {
        let response = builder.send().await.map_err(|source| {
            log::warn!("HTTP request to {} failed: {}", url, source);
            ClientError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        log::debug!("{} -> {}", url, status);

        let body = response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            log::warn!("HTTP request to {} failed with status: {}", url, status);
            return Err(ClientError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        Ok(body)
    }
}

fn decode<R: DeserializeOwned>(url: &str, body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|source| {
        log::warn!("Failed to parse JSON response from {}: {}", url, source);
        ClientError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

fn lenient_payload(body: String) -> OpaquePayload {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}
