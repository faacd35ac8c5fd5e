//! jpostdb-cli
//! ===========
//!
//! Command-line interface for the `jpostdb-core` catalog crate.
//!
//! The binary (`jpostdb`) is the deliverable; this library target only
//! carries the overview for rendered docs.
//!
//! Quick start
//! -----------
//!
//! ```text
//! jpostdb --help
//! jpostdb prefectures
//! jpostdb search --pref 13 --name Shinjuku
//! TCB_ENV_ID=.. TCB_SECRET_ID=.. TCB_SECRET_KEY=.. \
//!     jpostdb load fuke.json --endpoint https://store.example/v1
//! ```
//!
//! For programmatic access use [`jpostdb-core`] directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
