//! Shared HTTP client for the portal REST API.
//!
//! Every request gets the session credential attached, and every 401 tears
//! the session down and sends the user to the login page before the error
//! reaches the caller. Error bodies are classified into [`ApiError`] here so
//! no caller has to inspect them.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::credential::SessionCredential;
use crate::error::{general_message, ApiError, ClientError};
use crate::router::{Navigation, Navigator, RouteName};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credential: Arc<SessionCredential>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        credential: Arc<SessionCredential>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credential,
            navigator,
        })
    }

    pub fn credential(&self) -> &Arc<SessionCredential> {
        &self.credential
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ─── Typed helpers ───

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.get_value(path).await?)
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        decode(self.get_value_with(path, query).await?)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        decode(self.post_value(path, body).await?)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path).json(body);
        decode(self.execute(Method::PUT, path, builder).await?)
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PATCH, path).json(body);
        decode(self.execute(Method::PATCH, path, builder).await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, path);
        self.execute(Method::DELETE, path, builder).await?;
        Ok(())
    }

    // ─── Raw JSON helpers (used where the payload shape varies) ───

    pub async fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        let builder = self.request(Method::GET, path);
        self.execute(Method::GET, path, builder).await
    }

    pub async fn get_value_with<Q>(&self, path: &str, query: &Q) -> Result<Value, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.execute(Method::GET, path, builder).await
    }

    pub async fn post_value<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, builder).await
    }

    // ─── Interceptors ───

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.credential.authorization_header() {
            Some(header) => builder.header(AUTHORIZATION, header),
            None => builder,
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Value, ApiError> {
        debug!(%method, path, "API request");

        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "API request failed without response");
            ApiError::transport(e)
        })?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(&method, path);
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::Unauthorized {
                message: general_message(&parse_body(&body)),
            });
        }

        let body = response.bytes().await.map_err(ApiError::transport)?;

        if !status.is_success() {
            debug!(%method, path, status = status.as_u16(), "API error response");
            return Err(ApiError::from_response(status.as_u16(), &parse_body(&body)));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(ApiError::decode)
    }

    /// Clear the credential, then redirect. Runs once per 401 response.
    fn handle_unauthorized(&self, method: &Method, path: &str) {
        warn!(%method, path, "Received 401, ending session");
        self.credential.clear();
        self.navigator.navigate(Navigation::to(RouteName::Login));
    }
}

fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(ApiError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    use clinic_store::MemoryStorage;

    use crate::router::ChannelNavigator;

    fn client(api_url: &str) -> ApiClient {
        let config = ClientConfig {
            api_url: api_url.to_string(),
            ..Default::default()
        };
        let credential = Arc::new(SessionCredential::new(Arc::new(MemoryStorage::new())));
        let (navigator, _rx) = ChannelNavigator::new();
        ApiClient::new(&config, credential, Arc::new(navigator)).unwrap()
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let api = client("http://localhost:8000/api/");
        assert_eq!(api.base_url(), "http://localhost:8000/api");
        assert_eq!(api.url("/auth/login/"), "http://localhost:8000/api/auth/login/");
        assert_eq!(api.url("profile/"), "http://localhost:8000/api/profile/");
    }

    #[test]
    fn unparseable_error_body_reads_as_null() {
        assert_eq!(parse_body(b"<html>502</html>"), Value::Null);
        assert_eq!(parse_body(b""), Value::Null);
    }
}
