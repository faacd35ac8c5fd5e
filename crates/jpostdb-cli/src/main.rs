//! jpostdb: command-line front end for jpostdb-core
//!
//! Two jobs share this binary: loading a JSON document dump into the catalog's
//! document store, and querying the catalog API the same way the web pages do
//! (the faceted search controller drives every query command).
//!
//! Usage examples
//! --------------
//!
//! - Load a dump (credentials from TCB_ENV_ID, TCB_SECRET_ID, TCB_SECRET_KEY)
//!   $ jpostdb load fuke.json --endpoint https://store.example/v1
//!   $ jpostdb load cards.json.gz --collection ManholeCard
//!
//! - List prefectures or cities
//!   $ jpostdb prefectures --variant manhole-card
//!   $ jpostdb cities 13
//!
//! - Search, walking three result pages
//!   $ jpostdb search --pref 13 --city 101 --name Shinjuku --pages 3
//!
//! `--base-url` (or `JPOSTDB_BASE_URL`) points the query commands at the API.
//! Log output goes to stderr; `RUST_LOG` overrides `--log-level`.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use jpostdb_core::loader::{read_documents, BatchLoader, HttpDocumentStore, StoreCredentials};
use jpostdb_core::{
    FacetOption, FacetedSearchController, FukeItem, ManholeCardItem, ReqwestTransport, SearchState,
    VariantConfig,
};
use serde_json::Value;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Controller = FacetedSearchController<ReqwestTransport>;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Load {
            input,
            collection,
            endpoint,
        } => load(&input, &collection, &endpoint),

        Commands::Prefectures { variant } => {
            let config = VariantConfig::by_name(&variant)?;
            let ctrl = Controller::new(config, ReqwestTransport::new(&args.base_url));
            block_on(async {
                ctrl.init().await;
                let state = settled(&ctrl)?;
                for opt in &state.primary_options {
                    println!("{:>3}  {}", opt.id, describe(opt));
                }
                Ok(())
            })
        }

        Commands::Cities { pref_id } => {
            let ctrl = Controller::new(VariantConfig::fuke(), ReqwestTransport::new(&args.base_url));
            block_on(async {
                ctrl.select_primary_facet(Some(pref_id)).await;
                let state = settled(&ctrl)?;
                if state.secondary_options.is_empty() {
                    println!("No cities found for prefecture {pref_id}");
                }
                for opt in &state.secondary_options {
                    println!("{:>6}  {}", opt.id, describe(opt));
                }
                Ok(())
            })
        }

        Commands::Search {
            variant,
            pref,
            city,
            name,
            pages,
        } => {
            let config = VariantConfig::by_name(&variant)?;
            let ctrl = Controller::new(config, ReqwestTransport::new(&args.base_url));
            block_on(search(&ctrl, pref, city, name, pages.max(1)))
        }
    }
}

fn block_on<F>(fut: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?
        .block_on(fut)
}

fn load(input: &Path, collection: &str, endpoint: &str) -> anyhow::Result<()> {
    let credentials = StoreCredentials::from_env()?;
    let docs = read_documents(input).with_context(|| format!("reading {}", input.display()))?;
    info!(input = %input.display(), documents = docs.len(), collection, "loading documents");
    let mut store = HttpDocumentStore::new(endpoint, credentials);

    let report = BatchLoader::new(collection)
        .run(&mut store, &docs, |p| {
            println!("Wrote {}/{} documents", p.written, p.total);
        })
        .with_context(|| format!("loading into collection {collection}"))?;

    println!(
        "Loaded {} documents into {collection} ({} batches)",
        report.written, report.batches
    );
    Ok(())
}

async fn search(
    ctrl: &Controller,
    pref: Option<i64>,
    city: Option<i64>,
    name: Option<String>,
    pages: u32,
) -> anyhow::Result<()> {
    info!(variant = %ctrl.config().name, ?pref, ?city, ?name, pages, "searching");
    ctrl.init().await;
    settled(ctrl)?;

    if pref.is_some() {
        ctrl.select_primary_facet(pref).await;
        settled(ctrl)?;
    }
    if city.is_some() {
        ctrl.select_secondary_facet(city);
    }
    if let Some(name) = name {
        ctrl.set_name_keyword(name);
    }

    println!("Filter: {}", ctrl.filter_label());
    ctrl.apply_filter().await;
    print_page(ctrl.config(), &settled(ctrl)?);

    for _ in 1..pages {
        if !ctrl.with_state(SearchState::has_next_page) {
            break;
        }
        ctrl.next_page().await;
        print_page(ctrl.config(), &settled(ctrl)?);
    }
    Ok(())
}

/// The state after an operation, or its error message as an `Err`.
fn settled(ctrl: &Controller) -> anyhow::Result<SearchState> {
    let state = ctrl.snapshot();
    if state.has_error() {
        bail!("{}", state.error);
    }
    Ok(state)
}

fn describe(opt: &FacetOption) -> String {
    let mut parts: Vec<&str> = ["full_name", "name", "en_name", "kind"]
        .iter()
        .filter_map(|key| opt.field(key))
        .collect();
    parts.dedup();
    parts.join(" / ")
}

fn print_page(config: &VariantConfig, state: &SearchState) {
    let p = &state.pagination;
    println!(
        "Page {}/{} ({} results, {} per page)",
        p.page,
        state.total_pages(),
        p.total,
        p.page_size
    );
    for item in &state.items {
        println!("  {}", item_line(config, item));
    }
}

fn item_line(config: &VariantConfig, item: &Value) -> String {
    if config.has_secondary() {
        if let Ok(fuke) = serde_json::from_value::<FukeItem>(item.clone()) {
            return format!(
                "#{} {} | {} 〒{} {}",
                fuke.id,
                fuke.name,
                fuke.jpost_office_name,
                fuke.jpost_office_postcode,
                fuke.jpost_office_address
            );
        }
    } else if let Ok(card) = serde_json::from_value::<ManholeCardItem>(item.clone()) {
        return format!(
            "#{} {} [{}] {}",
            card.id, card.name, card.series, card.prefecture_name
        );
    }
    item.to_string()
}
