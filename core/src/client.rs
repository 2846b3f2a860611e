//! Request factory and executor.
//!
//! # Design
//! `ApiClient` owns three injected collaborators: the base URL, a transport
//! and a codec, plus an optional token provider. None of them change after
//! construction, so one client can be cloned and shared by any number of
//! concurrent calls. Building a request is synchronous and I/O free;
//! `run` suspends exactly once, on the transport call.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::codec::JsonCodec;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::HttpRequest;
use crate::status::validate_response;
use crate::token::AccessTokenProvider;
use crate::transport::{ReqwestTransport, Transport};

pub const AUTHORIZATION: &str = "Authorization";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    codec: JsonCodec,
    transport: Arc<dyn Transport>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("codec", &self.codec)
            .field("authenticated", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// A client for `base_url` using `reqwest`, snake_case keys and no token.
    pub fn new(base_url: &str) -> Self {
        Self::builder(ClientConfig::new(base_url)).build()
    }

    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            transport: None,
            token_provider: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Build a `GET` request for `base_url + path`.
    ///
    /// Adds `Authorization: Bearer <token>` when the token provider yields a
    /// non-empty token; otherwise the request goes out unauthenticated.
    ///
    /// The URL check is the lenient WHATWG parse done by `url::Url`, not a
    /// strict RFC 3986 validation: a path containing a space, for example, is
    /// accepted and percent-encoded by the transport.
    pub fn request(&self, path: &str) -> Result<HttpRequest> {
        let url = format!("{}{}", self.base_url, path);
        if let Err(e) = Url::parse(&url) {
            debug!(%url, error = %e, "rejecting request path");
            return Err(ApiError::construction("Invalid network path"));
        }

        let mut request = HttpRequest::new(url);
        let token = self
            .token_provider
            .as_ref()
            .and_then(|provider| provider.access_token())
            .filter(|token| !token.is_empty());
        if let Some(token) = token {
            request.set_header(AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(request)
    }

    /// Execute `request` and return the body of a 2xx (or status-less)
    /// response. Transport errors are passed through untouched.
    pub async fn run(&self, request: HttpRequest) -> Result<Bytes> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(ApiError::Transport)?;
        debug!(status = ?response.status, "received response");
        let body = validate_response(response)?;
        trace!(bytes = body.len(), "response body accepted");
        Ok(body)
    }

    /// `run`, then decode the body as `{"data": T}` and return `data`.
    pub async fn run_and_decode<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let body = self.run(request).await?;
        self.codec.decode_envelope(&body)
    }
}

pub struct ApiClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    token_provider: Option<Arc<dyn AccessTokenProvider>>,
}

impl ApiClientBuilder {
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn token_provider(mut self, provider: impl AccessTokenProvider + 'static) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            base_url: self.config.base_url,
            codec: JsonCodec::new(self.config.key_convention),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            token_provider: self.token_provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::token::StaticToken;

    const BASE_URL: &str = "http://localhost:3000";

    fn client() -> ApiClient {
        ApiClient::new(BASE_URL)
    }

    #[test]
    fn request_url_is_base_plus_path() {
        for path in ["/users", "/users/5", "/users?page=1", ""] {
            let req = client().request(path).unwrap();
            assert_eq!(req.url, format!("{BASE_URL}{path}"));
            assert_eq!(req.method, HttpMethod::Get);
            assert!(req.body.is_none());
        }
    }

    #[test]
    fn invalid_path_is_a_construction_error() {
        let err = client().request(":99999/users").unwrap_err();
        assert!(matches!(err, ApiError::Construction { .. }));
        assert_eq!(err.message(), "Invalid network path");
    }

    #[test]
    fn lenient_url_check_accepts_a_space_in_the_path() {
        let req = client().request("/users/ada lovelace").unwrap();
        assert_eq!(req.url, "http://localhost:3000/users/ada lovelace");
    }

    #[test]
    fn invalid_base_url_is_a_construction_error() {
        let err = ApiClient::new("not a base").request("/users").unwrap_err();
        assert!(matches!(err, ApiError::Construction { .. }));
    }

    #[test]
    fn token_is_sent_as_bearer() {
        let client = ApiClient::builder(ClientConfig::new(BASE_URL))
            .token_provider(StaticToken::new("abc123"))
            .build();
        let req = client.request("/users").unwrap();
        assert_eq!(req.header(AUTHORIZATION), Some("Bearer abc123"));
    }

    #[test]
    fn missing_or_empty_token_builds_unauthenticated() {
        let req = client().request("/users").unwrap();
        assert!(req.header(AUTHORIZATION).is_none());

        let client = ApiClient::builder(ClientConfig::new(BASE_URL))
            .token_provider(|| None::<String>)
            .build();
        assert!(client.request("/users").unwrap().headers.is_empty());

        let client = ApiClient::builder(ClientConfig::new(BASE_URL))
            .token_provider(|| Some(String::new()))
            .build();
        assert!(client.request("/users").unwrap().headers.is_empty());
    }

    #[test]
    fn provider_is_asked_on_every_build() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let client = ApiClient::builder(ClientConfig::new(BASE_URL))
            .token_provider(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                Some(format!("token-{n}"))
            })
            .build();

        assert_eq!(
            client.request("/a").unwrap().header(AUTHORIZATION),
            Some("Bearer token-0")
        );
        assert_eq!(
            client.request("/b").unwrap().header(AUTHORIZATION),
            Some("Bearer token-1")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_does_not_expose_the_provider() {
        let client = ApiClient::builder(ClientConfig::new(BASE_URL))
            .token_provider(StaticToken::new("s3cret"))
            .build();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("authenticated: true"));
        assert!(!rendered.contains("s3cret"));
    }
}
