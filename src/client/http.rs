//! reqwest-backed resource client

use async_trait::async_trait;

use crate::{
    client::{decode_collection, decode_record, CollectionShape, ResourceClient},
    config::ApiConfig,
    error::{AppError, AppResult, FetchError},
    models::{Record, SearchQuery},
};

#[derive(Clone)]
pub struct HttpResourceClient {
    http: reqwest::Client,
}

impl HttpResourceClient {
    /// Create a client with the configured timeout and user agent
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn fetch_collection(
        &self,
        url: &str,
        query: &SearchQuery,
        shape: &CollectionShape,
    ) -> Result<Vec<Record>, FetchError> {
        tracing::debug!("GET {} params={:?}", url, query.to_params());

        let response = self.http.get(url).query(&query.to_params()).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let records = decode_collection(&body, shape)?;
        tracing::debug!("GET {} decoded {} records", url, records.len());
        Ok(records)
    }

    async fn create_record(&self, url: &str, record: &Record) -> Result<Record, FetchError> {
        tracing::debug!("POST {}", url);

        let response = self.http.post(url).json(record).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("POST {} returned {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_record(&body)
    }
}
