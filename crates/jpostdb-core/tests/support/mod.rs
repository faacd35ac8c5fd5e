#![allow(dead_code)]

use async_trait::async_trait;
use jpostdb_core::{build_url, CatalogError, QueryPairs, Result, Transport};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use tokio::sync::oneshot;

pub const FUKE_PREFS: &str = "/api/fuke/prefectures";
pub const FUKE_CITIES: &str = "/api/fuke/cities";
pub const FUKE_SEARCH: &str = "/api/fuke/search";
pub const PREFS: &str = "/api/prefectures";
pub const MANHOLE_SEARCH: &str = "/api/manhole-card/search";

enum Reply {
    Json(Value),
    Status(u16),
    Held(oneshot::Receiver<Result<Value>>),
}

/// In-memory transport answering each path from a FIFO of scripted replies.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<(String, QueryPairs)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &str, reply: Reply) {
        self.replies
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn reply(&self, path: &str, body: Value) {
        self.push(path, Reply::Json(body));
    }

    pub fn fail(&self, path: &str, status: u16) {
        self.push(path, Reply::Status(status));
    }

    /// The next call to `path` stays in flight until the sender is used.
    pub fn hold(&self, path: &str) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.push(path, Reply::Held(rx));
        tx
    }

    /// Rendered URLs (`path?query`) of every call, in order.
    pub fn urls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(path, query)| build_url(path, query))
            .collect()
    }

    pub fn calls_to(&self, path: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(p, q)| build_url(p, q))
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.calls
            .borrow_mut()
            .push((path.to_string(), query.to_vec()));

        let reply = self
            .replies
            .borrow_mut()
            .get_mut(path)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Json(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(CatalogError::Status {
                status,
                url: path.to_string(),
            }),
            Some(Reply::Held(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(CatalogError::Transport("reply dropped".into()))),
            None => Err(CatalogError::Transport(format!("no reply scripted for {path}"))),
        }
    }
}

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

pub fn tokyo_prefectures() -> Value {
    json!([
        { "id": 13, "pref_id": 13, "name": "東京都", "full_name": "Tokyo", "en_name": "Tokyo" },
        { "id": 27, "pref_id": 27, "name": "大阪府", "full_name": "Osaka", "en_name": "Osaka" }
    ])
}

pub fn cities(entries: &[(i64, &str)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name, "pref_id": 13 }))
            .collect(),
    )
}

pub fn page(items: usize, total: u64, page: u32, page_size: u32) -> Value {
    let items: Vec<Value> = (0..items).map(|i| json!({ "id": i, "name": format!("item {i}") })).collect();
    json!({ "items": items, "total": total, "page": page, "page_size": page_size })
}
