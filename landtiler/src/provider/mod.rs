//! Land-cover tile fetchers
//!
//! The assembler only depends on the [`TileFetcher`] trait. The bundled
//! implementation, [`GridEndpointProvider`], queries a JSON grid endpoint
//! through an injected [`HttpClient`]:
//!
//! ```ignore
//! use landtiler::provider::{GridEndpointProvider, ReqwestClient};
//!
//! let http_client = ReqwestClient::with_timeout(30)?;
//! let provider = GridEndpointProvider::new(http_client, url_template);
//! ```

mod endpoint;
mod http;
mod types;

pub use endpoint::{GridEndpointProvider, DEFAULT_BAND};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{FetchError, TileFetcher};

#[cfg(test)]
pub use http::tests::MockHttpClient;
