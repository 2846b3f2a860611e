//! Bearer token accessors.
//!
//! The client asks for a token each time it builds a request and never
//! caches or refreshes it; token lifecycle belongs to the caller.

/// Supplies the current bearer token, if any.
///
/// Returning `None` or an empty string means the request is built without an
/// `Authorization` header. Any `Fn() -> Option<String>` closure works as a
/// provider.
pub trait AccessTokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

impl<F> AccessTokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn access_token(&self) -> Option<String> {
        self()
    }
}

/// A provider that always returns the same token.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &"<redacted>").finish()
    }
}

impl AccessTokenProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}
