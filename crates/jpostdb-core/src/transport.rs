// crates/jpostdb-core/src/transport.rs

//! # Transport
//!
//! The controller only ever issues `GET path?query` and expects JSON back.
//! This module defines that seam plus the native (reqwest) implementation;
//! the browser implementation lives in `jpostdb-wasm`.

use crate::error::Result;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::rc::Rc;

/// Characters left as-is in query components (RFC 3986 unreserved).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Ordered `(name, value)` query parameters.
pub type QueryPairs = Vec<(String, String)>;

/// A JSON-over-HTTP GET client.
///
/// Implementations must treat any non-2xx status and any network-level
/// failure as an error. The trait is `?Send` so that the same controller can
/// run on a browser event loop.
#[async_trait(?Send)]
pub trait Transport {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for Rc<T> {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        (**self).get_json(path, query).await
    }
}

/// Renders `path?a=1&b=x%20y`. Without parameters the path is returned as-is.
pub fn build_url(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let encoded: Vec<String> = query
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_COMPONENT),
                utf8_percent_encode(v, QUERY_COMPONENT)
            )
        })
        .collect();
    format!("{path}?{}", encoded.join("&"))
}

// -----------------------------------------------------------------------------
// NATIVE TRANSPORT (reqwest)
// -----------------------------------------------------------------------------

#[cfg(feature = "http")]
pub use self::http::ReqwestTransport;

#[cfg(feature = "http")]
mod http {
    use super::{build_url, Transport};
    use crate::error::{CatalogError, Result};
    use async_trait::async_trait;
    use serde_json::Value;
    use tracing::debug;

    /// Talks to a catalog server at `base_url` (e.g. `http://127.0.0.1:8000`).
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
        base_url: String,
    }

    impl ReqwestTransport {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self::with_client(reqwest::Client::new(), base_url)
        }

        pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
            let base_url = base_url.into().trim_end_matches('/').to_string();
            Self { client, base_url }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }
    }

    #[async_trait(?Send)]
    impl Transport for ReqwestTransport {
        async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
            let url = format!("{}{}", self.base_url, build_url(path, query));
            debug!(%url, "GET");

            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(CatalogError::transport)?;

            let status = resp.status();
            if !status.is_success() {
                return Err(CatalogError::Status {
                    status: status.as_u16(),
                    url,
                });
            }

            let body = resp.text().await.map_err(CatalogError::transport)?;
            Ok(serde_json::from_str(&body)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> QueryPairs {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn url_without_query_is_the_path() {
        assert_eq!(build_url("/api/prefectures", &[]), "/api/prefectures");
    }

    #[test]
    fn url_keeps_parameter_order() {
        let q = pairs(&[("pref_id", "13"), ("page", "1"), ("page_size", "12")]);
        assert_eq!(
            build_url("/api/fuke/search", &q),
            "/api/fuke/search?pref_id=13&page=1&page_size=12"
        );
    }

    #[test]
    fn url_encodes_non_ascii_and_reserved() {
        let q = pairs(&[("jpost_name", "新宿 局&")]);
        assert_eq!(
            build_url("/s", &q),
            "/s?jpost_name=%E6%96%B0%E5%AE%BF%20%E5%B1%80%26"
        );
    }
}
