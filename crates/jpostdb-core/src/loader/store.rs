// crates/jpostdb-core/src/loader/store.rs
use crate::error::{CatalogError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::env;

pub const ENV_ID_VAR: &str = "TCB_ENV_ID";
pub const SECRET_ID_VAR: &str = "TCB_SECRET_ID";
pub const SECRET_KEY_VAR: &str = "TCB_SECRET_KEY";

/// Access credentials of the document store environment.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub env_id: String,
    pub secret_id: String,
    pub secret_key: String,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("env_id", &self.env_id)
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl StoreCredentials {
    /// Reads `TCB_ENV_ID`, `TCB_SECRET_ID` and `TCB_SECRET_KEY`.
    ///
    /// Every unset or blank variable is named in the error, not just the first.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut get = |key: &'static str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        };

        let env_id = get(ENV_ID_VAR);
        let secret_id = get(SECRET_ID_VAR);
        let secret_key = get(SECRET_KEY_VAR);

        if !missing.is_empty() {
            return Err(CatalogError::MissingCredentials(missing));
        }
        Ok(Self {
            env_id,
            secret_id,
            secret_key,
        })
    }
}

/// Destination of the batch loader. One document per call.
pub trait DocumentStore {
    fn add(&mut self, collection: &str, doc: &Value) -> Result<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &mut S {
    fn add(&mut self, collection: &str, doc: &Value) -> Result<()> {
        (**self).add(collection, doc)
    }
}

/// Keeps documents in memory, per collection. Used by tests and demos.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: BTreeMap<String, Vec<Value>>,
    /// When set, the write with this zero-based index fails.
    fail_at: Option<usize>,
    writes: usize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `index`-th write (zero-based) fails.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn documents(&self, collection: &str) -> &[Value] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of `add` calls made, including a failed one.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn add(&mut self, collection: &str, doc: &Value) -> Result<()> {
        let index = self.writes;
        self.writes += 1;
        if self.fail_at == Some(index) {
            return Err(CatalogError::Transport(format!(
                "simulated write failure at document {index}"
            )));
        }
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// HTTP STORE (blocking reqwest)
// -----------------------------------------------------------------------------

#[cfg(feature = "loader")]
pub use self::http::HttpDocumentStore;

#[cfg(feature = "loader")]
mod http {
    use super::{DocumentStore, StoreCredentials};
    use crate::error::{CatalogError, Result};
    use serde_json::Value;
    use tracing::trace;

    /// Writes documents through the store's REST gateway:
    /// `POST {endpoint}/{env_id}/collections/{collection}/documents`,
    /// authenticated with the secret id/key pair.
    pub struct HttpDocumentStore {
        client: reqwest::blocking::Client,
        endpoint: String,
        credentials: StoreCredentials,
    }

    impl HttpDocumentStore {
        pub fn new(endpoint: impl Into<String>, credentials: StoreCredentials) -> Self {
            Self {
                client: reqwest::blocking::Client::new(),
                endpoint: endpoint.into().trim_end_matches('/').to_string(),
                credentials,
            }
        }

        pub fn document_url(&self, collection: &str) -> String {
            format!(
                "{}/{}/collections/{}/documents",
                self.endpoint, self.credentials.env_id, collection
            )
        }
    }

    impl DocumentStore for HttpDocumentStore {
        fn add(&mut self, collection: &str, doc: &Value) -> Result<()> {
            let url = self.document_url(collection);
            let body = serde_json::to_vec(doc)?;
            trace!(%url, bytes = body.len(), "adding document");

            let resp = self
                .client
                .post(&url)
                .basic_auth(&self.credentials.secret_id, Some(&self.credentials.secret_key))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .map_err(CatalogError::transport)?;

            let status = resp.status();
            if !status.is_success() {
                return Err(CatalogError::Status {
                    status: status.as_u16(),
                    url,
                });
            }
            Ok(())
        }
    }

}
