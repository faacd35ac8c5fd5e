use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for jpostdb
#[derive(Debug, Parser)]
#[command(
    name = "jpostdb",
    version,
    about = "Load and search the Japan Post scenic postmark and manhole card catalogs"
)]
pub struct CliArgs {
    /// Base URL of the catalog API (e.g. https://jpost.example.org)
    #[arg(
        short = 'u',
        long = "base-url",
        env = "JPOSTDB_BASE_URL",
        default_value = "http://127.0.0.1:8000",
        global = true
    )]
    pub base_url: String,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a JSON document array to the document store, one document at a time
    Load {
        /// Path to the JSON array (plain or .gz)
        input: PathBuf,

        /// Target collection
        #[arg(short = 'c', long = "collection", default_value = "JPostFuke")]
        collection: String,

        /// REST endpoint of the document store
        #[arg(short = 'e', long = "endpoint", env = "JPOSTDB_STORE_ENDPOINT")]
        endpoint: String,
    },

    /// List the prefectures offered by a catalog
    Prefectures {
        /// Catalog variant: fuke or manhole-card
        #[arg(short = 'v', long = "variant", default_value = "fuke")]
        variant: String,
    },

    /// List the cities of a prefecture (scenic postmark catalog)
    Cities {
        /// Prefecture id
        pref_id: i64,
    },

    /// Run a filtered search and print the result pages
    Search {
        /// Catalog variant: fuke or manhole-card
        #[arg(short = 'v', long = "variant", default_value = "fuke")]
        variant: String,

        /// Prefecture id
        #[arg(short = 'p', long = "pref")]
        pref: Option<i64>,

        /// City id (fuke only)
        #[arg(short = 'c', long = "city")]
        city: Option<i64>,

        /// Name keyword (office name for fuke, card name for manhole-card)
        #[arg(short = 'n', long = "name")]
        name: Option<String>,

        /// Number of pages to walk through
        #[arg(long = "pages", default_value_t = 1)]
        pages: u32,
    },
}
