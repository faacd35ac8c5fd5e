//! Scenic postmark walkthrough
//!
//! Drives the fuke search controller against a small in-memory catalog:
//! - Load the prefecture list
//! - Pick a prefecture, then a city
//! - Search by office name and page through the results
//!
//! Run with: cargo run --example fuke_walkthrough

use async_trait::async_trait;
use jpostdb_rs::prelude::*;
use serde_json::{json, Value};

/// Serves a fixed catalog: two prefectures, three cities, 30 postmarks.
struct DemoCatalog {
    postmarks: Vec<Value>,
}

impl DemoCatalog {
    fn new() -> Self {
        let cities = [(13, 101, "Shinjuku"), (13, 102, "Shibuya"), (27, 2701, "Kita")];
        let postmarks = (1..=30)
            .map(|i| {
                let (pref_id, city_id, city) = cities[i % cities.len()];
                json!({
                    "id": i,
                    "name": format!("{city} scenic postmark #{i}"),
                    "jpost_office_name": format!("{city} Post Office {i}"),
                    "jpost_office_address": format!("{city} 1-{i}"),
                    "jpost_office_postcode": format!("160-{i:04}"),
                    "pref_id": pref_id,
                    "city_id": city_id,
                })
            })
            .collect();
        Self { postmarks }
    }

    fn search(&self, query: &[(String, String)]) -> Value {
        let param = |name: &str| query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
        let int = |name: &str| param(name).and_then(|v| v.parse::<i64>().ok());
        let page = int("page").unwrap_or(1).max(1) as usize;
        let page_size = int("page_size").unwrap_or(12).max(1) as usize;

        let hits: Vec<&Value> = self
            .postmarks
            .iter()
            .filter(|p| int("pref_id").map_or(true, |id| p["pref_id"] == id))
            .filter(|p| int("city_id").map_or(true, |id| p["city_id"] == id))
            .filter(|p| {
                param("jpost_name").map_or(true, |kw| {
                    p["jpost_office_name"].as_str().unwrap_or("").contains(kw)
                })
            })
            .collect();

        let items: Vec<&Value> = hits.iter().copied().skip((page - 1) * page_size).take(page_size).collect();
        json!({ "items": items, "total": hits.len(), "page": page, "page_size": page_size })
    }
}

#[async_trait(?Send)]
impl Transport for DemoCatalog {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        match path {
            "/api/fuke/prefectures" => Ok(json!([
                { "pref_id": 13, "full_name": "東京都", "en_name": "Tokyo" },
                { "pref_id": 27, "full_name": "大阪府", "en_name": "Osaka" }
            ])),
            "/api/fuke/cities" => {
                let pref = query.first().map(|(_, v)| v.as_str());
                Ok(match pref {
                    Some("13") => json!([{ "id": 101, "name": "Shinjuku" }, { "id": 102, "name": "Shibuya" }]),
                    Some("27") => json!([{ "id": 2701, "name": "Kita" }]),
                    _ => json!([]),
                })
            }
            "/api/fuke/search" => Ok(self.search(query)),
            other => Err(CatalogError::NotFound(other.to_string())),
        }
    }
}

fn print_state(state: &SearchState) {
    let p = &state.pagination;
    println!(
        "Page {}/{} ({} results)",
        p.page,
        state.total_pages(),
        p.total
    );
    for item in &state.items {
        println!("  - {}", item["jpost_office_name"].as_str().unwrap_or("?"));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== jpostdb scenic postmark walkthrough ===\n");

    let search = FacetedSearchController::new(VariantConfig::fuke(), DemoCatalog::new());
    search.subscribe(|change, state| {
        if change == StateChange::Loading && state.loading_any() {
            println!("  (loading...)");
        }
    });

    println!("--- Step 1: prefectures ---");
    search.init().await;
    for pref in search.snapshot().primary_options {
        println!("{:>3} {}", pref.id, pref.field("en_name").unwrap_or("?"));
    }
    println!();

    println!("--- Step 2: Tokyo, all cities ---");
    search.select_primary_facet(Some(13)).await;
    search.apply_filter().await;
    println!("Filter: {}", search.filter_label());
    print_state(&search.snapshot());
    println!();

    println!("--- Step 3: next page ---");
    search.next_page().await;
    print_state(&search.snapshot());
    println!();

    println!("--- Step 4: Shinjuku, office name \"Office 1\" ---");
    search.select_secondary_facet(Some(101));
    search.set_name_keyword("Office 1");
    search.apply_filter().await;
    println!("Filter: {}", search.filter_label());
    print_state(&search.snapshot());
    println!();

    println!("--- Step 5: reset ---");
    search.reset_filter();
    println!("Filter: {}", search.filter_label());
}
