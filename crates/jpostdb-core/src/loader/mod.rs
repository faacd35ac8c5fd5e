// crates/jpostdb-core/src/loader/mod.rs

//! # Batch Document Loader
//!
//! Pushes a JSON array of documents (as produced by the catalog migration
//! scripts) into the remote document store.
//!
//! The store is written one document per call: its bulk insert cannot be
//! relied on to accept more than one document. Documents are still grouped
//! into logical batches of [`DEFAULT_BATCH_SIZE`], which only controls how
//! often progress is reported. The first failed write aborts the run.

use crate::error::Result;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

mod batch;
mod common_io;
mod store;

pub use batch::{BatchLoader, LoadProgress, LoadReport};
pub use common_io::open_stream;
pub use store::{DocumentStore, MemoryDocumentStore, StoreCredentials};

#[cfg(feature = "loader")]
pub use store::HttpDocumentStore;

pub const DEFAULT_COLLECTION: &str = "JPostFuke";
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Reads the document array at `path` (`.json` or `.json.gz`).
///
/// Any other top-level value is logged and read as an empty list, so the
/// run that follows writes nothing and succeeds.
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let reader = open_stream(path)?;
    let body: Value = serde_json::from_reader(reader)?;

    match body {
        Value::Array(docs) => Ok(docs),
        other => {
            warn!(
                path = %path.display(),
                found = kind_of(&other),
                "input is not a JSON array of documents, skipping"
            );
            Ok(Vec::new())
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::io::Write;

    #[test]
    fn reads_plain_json_array() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"name":"a"}},{{"name":"b"}}]"#).unwrap();
        let docs = read_documents(file.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["name"], "b");
    }

    #[test]
    fn non_array_input_reads_as_empty() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name":"a"}}"#).unwrap();
        assert!(read_documents(file.path()).unwrap().is_empty());
    }

    #[test]
    fn non_array_input_loads_nothing_and_succeeds() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "null").unwrap();
        let docs = read_documents(file.path()).unwrap();

        let mut store = MemoryDocumentStore::new();
        let report = BatchLoader::default().run(&mut store, &docs, |_| {}).unwrap();
        assert_eq!(report, LoadReport { written: 0, batches: 0 });
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_documents("/definitely/not/here/docs.json").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[{{").unwrap();
        assert!(matches!(read_documents(file.path()), Err(CatalogError::Json(_))));
    }

    #[cfg(feature = "compact")]
    #[test]
    fn reads_gzipped_json_array() {
        use flate2::{write::GzEncoder, Compression};

        let file = tempfile::Builder::new().suffix(".json.gz").tempfile().unwrap();
        let mut enc = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        enc.write_all(br#"[{"id":1},{"id":2},{"id":3}]"#).unwrap();
        enc.finish().unwrap();

        let docs = read_documents(file.path()).unwrap();
        assert_eq!(docs.len(), 3);
    }
}
