//! Request-building and response-validation pipeline for JSON APIs.
//!
//! # Overview
//! `ApiClient::request` turns a path into an `HttpRequest` aimed at a fixed
//! origin, with a bearer token when one is available. The `with_*`
//! transforms add query parameters, a JSON body or a method. `run` sends the
//! request through a `Transport` and checks the status; `run_and_decode`
//! additionally unwraps the `{"data": T}` envelope.
//!
//! # Design
//! - Transport, codec and token provider are injected; there are no globals.
//! - Everything except `Transport::execute` is synchronous and I/O free, so
//!   hosts that do their own I/O can call `validate_response` and
//!   `JsonCodec::decode_envelope` directly.
//! - Wire keys are snake_case; see `codec` for the conversion rules.

pub mod builder;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod status;
pub mod token;
pub mod transport;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder};
pub use codec::{JsonCodec, KeyConvention};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use status::{is_valid_status, validate_response};
pub use token::{AccessTokenProvider, StaticToken};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::ApiResponse;
