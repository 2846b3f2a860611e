//! Chainable transforms on `HttpRequest`.
//!
//! Each transform takes the request by value and returns the updated one, so
//! calls compose left to right:
//!
//! ```ignore
//! let req = client
//!     .request("/users")?
//!     .with_query("role", "admin")
//!     .with_body(&codec, &new_user, HttpMethod::Post)?;
//! ```

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::codec::JsonCodec;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

impl HttpRequest {
    /// Append `name=value` to the query string. Repeated names are kept.
    ///
    /// A request whose URL does not parse is returned unchanged.
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        let mut url = match Url::parse(&self.url) {
            Ok(url) => url,
            Err(e) => {
                debug!(url = %self.url, error = %e, "query not applied to unparseable url");
                return self;
            }
        };
        url.query_pairs_mut().append_pair(name, value);
        self.url = url.into();
        self
    }

    /// Encode `body` as JSON and attach it together with `method` and a JSON
    /// content type.
    pub fn with_body<T: Serialize + ?Sized>(
        mut self,
        codec: &JsonCodec,
        body: &T,
        method: HttpMethod,
    ) -> Result<Self> {
        let payload = codec.encode(body)?;
        self.method = method;
        self.set_header(CONTENT_TYPE, APPLICATION_JSON);
        self.body = Some(payload);
        Ok(self)
    }

    /// Set the method and declare a JSON content type. The body is left as
    /// is, so bodyless requests still carry `Content-Type: application/json`.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self.set_header(CONTENT_TYPE, APPLICATION_JSON);
        self
    }

    /// Set an arbitrary header, replacing any existing value for `name`.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }
}
