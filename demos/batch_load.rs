//! Batch load example
//!
//! Writes 250 generated postmark documents into an in-memory store, then
//! repeats the run against a store that rejects one write to show that the
//! loader stops at the first failure.
//!
//! Run with: cargo run --example batch_load

use jpostdb_rs::loader::DEFAULT_COLLECTION;
use jpostdb_rs::prelude::*;
use serde_json::{json, Value};

fn documents(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| {
            json!({
                "name": format!("Scenic postmark {i}"),
                "jpost_office_name": format!("Post Office {i}"),
                "pref_id": 13,
                "city_id": 101,
            })
        })
        .collect()
}

fn main() -> Result<()> {
    println!("=== jpostdb batch load example ===\n");
    let docs = documents(250);

    println!("--- Run 1: in-memory store ---");
    let mut store = MemoryDocumentStore::new();
    let report = BatchLoader::default().run(&mut store, &docs, |p: LoadProgress| {
        println!("Wrote {}/{} documents", p.written, p.total);
    })?;
    println!(
        "✓ {} documents in {} batches, {} stored in {DEFAULT_COLLECTION}\n",
        report.written,
        report.batches,
        store.documents(DEFAULT_COLLECTION).len()
    );

    println!("--- Run 2: store failing on document 180 ---");
    let mut flaky = MemoryDocumentStore::failing_at(179);
    match BatchLoader::new("Scratch").run(&mut flaky, &docs, |p| {
        println!("Wrote {}/{} documents", p.written, p.total);
    }) {
        Ok(report) => println!("unexpected success: {report:?}"),
        Err(err) => println!(
            "✗ stopped: {err} ({} documents stored)",
            flaky.documents("Scratch").len()
        ),
    }

    Ok(())
}
