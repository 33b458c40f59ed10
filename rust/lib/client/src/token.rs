use crate::ApiError;

/// Supplies the API key sent with every request.
///
/// Hosted PostgREST gateways expect the key twice: as the `apikey` header
/// and as a bearer token.
#[async_trait::async_trait]
pub trait KeySource: Send + Sync + 'static {
    async fn api_key(&self) -> Result<String, ApiError>;
}

/// A key fixed at startup, typically the project's service-role key.
pub struct StaticKey(String);

impl StaticKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

#[async_trait::async_trait]
impl KeySource for StaticKey {
    async fn api_key(&self) -> Result<String, ApiError> {
        if self.0.is_empty() {
            return Err(ApiError::Auth("empty api key".into()));
        }
        Ok(self.0.clone())
    }
}
