//! HTTP client for a PostgREST endpoint.

use std::sync::Arc;

use reqwest::header::{CONTENT_RANGE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::paging::{Page, PageRequest, PageSource, parse_content_range_total};
use crate::{ApiError, BackendConfig, KeySource, StaticKey};

/// Table-level CRUD over PostgREST.
///
/// Paths are `{rest_base}/{table}`; filters use PostgREST operator syntax
/// (`column=eq.value`).
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    key_source: Arc<dyn KeySource>,
}

impl RestClient {
    pub fn new(
        base_url: impl Into<String>,
        key_source: Arc<dyn KeySource>,
        timeout: std::time::Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_source,
        })
    }

    /// Client for the backend described by `config`, keyed by its API key.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ApiError> {
        Self::new(
            config.rest_base(),
            Arc::new(StaticKey::new(config.api_key.clone())),
            config.timeout,
        )
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Attach the key headers.
    async fn authed(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let key = self.key_source.api_key().await?;
        Ok(builder.header("apikey", key.clone()).bearer_auth(key))
    }

    /// Turn a non-success response into an `ApiError`.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    async fn decode<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// Select every row matching `filters` (each `(column, value)` becomes
    /// `column=eq.value`).
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        let mut query = vec![("select".to_string(), columns.to_string())];
        query.extend(eq_filters(filters));
        let req = self.http.get(self.table_url(table)).query(&query);
        let resp = self.authed(req).await?.send().await?;
        Self::decode(Self::check(resp).await?).await
    }

    /// Insert one row.
    pub async fn insert<B: Serialize + ?Sized>(&self, table: &str, row: &B) -> Result<(), ApiError> {
        let req = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(row);
        let resp = self.authed(req).await?.send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Delete rows matching every filter. Returns the number of rows removed.
    ///
    /// An empty filter list is rejected rather than deleting the table.
    pub async fn delete(&self, table: &str, filters: &[(&str, &str)]) -> Result<usize, ApiError> {
        if filters.is_empty() {
            return Err(ApiError::Server {
                status: 400,
                message: format!("refusing unfiltered delete on {}", table),
            });
        }
        let req = self
            .http
            .delete(self.table_url(table))
            .header("Prefer", "return=representation")
            .query(&eq_filters(filters));
        let resp = self.authed(req).await?.send().await?;
        let removed: Vec<serde_json::Value> = Self::decode(Self::check(resp).await?).await?;
        Ok(removed.len())
    }
}

#[async_trait::async_trait]
impl PageSource for RestClient {
    async fn fetch_page<T>(&self, request: &PageRequest<'_>) -> Result<Page<T>, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let query = [
            ("select", request.columns.to_string()),
            ("order", request.order.to_string()),
            ("offset", request.offset.to_string()),
            ("limit", request.limit.to_string()),
        ];
        let req = self
            .http
            .get(self.table_url(request.table))
            .header("Prefer", "count=exact")
            .query(&query);
        let resp = Self::check(self.authed(req).await?.send().await?).await?;

        let total = resp
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v: &HeaderValue| v.to_str().ok())
            .and_then(parse_content_range_total);
        let rows = Self::decode(resp).await?;
        Ok(Page { rows, total })
    }
}

fn eq_filters(filters: &[(&str, &str)]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(column, value)| (column.to_string(), format!("eq.{}", value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filters() {
        let filters = eq_filters(&[("user_id", "u-1"), ("role", "admin")]);
        assert_eq!(
            filters,
            vec![
                ("user_id".to_string(), "eq.u-1".to_string()),
                ("role".to_string(), "eq.admin".to_string()),
            ]
        );
    }

    #[test]
    fn test_table_url() {
        let client = RestClient::new(
            "https://abcd.supabase.co/rest/v1/",
            Arc::new(StaticKey::new("k")),
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.table_url("batches"),
            "https://abcd.supabase.co/rest/v1/batches"
        );
    }

    #[tokio::test]
    async fn test_unfiltered_delete_rejected() {
        let client = RestClient::new(
            "http://127.0.0.1:9",
            Arc::new(StaticKey::new("k")),
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        let err = client.delete("user_roles", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 400, .. }));
    }
}
