//! # Solr Seed
//!
//! Seeds a Solr core with a benchmark corpus: hand-built golden records that
//! known queries must find (plus near-miss traps they must not), padded with
//! random noise documents up to a target size.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────┐
//! │  Schema  │──▶│   Reset     │──▶│ Golden+Noise │──▶│  Loader  │──▶ Solr
//! │ add-field│   │ (optional)  │   │  generation  │   │ batches  │
//! └──────────┘   └─────────────┘   └──────────────┘   └──────────┘
//! ```
//!
//! Everything runs sequentially. Network failures are logged and recorded in
//! the [`seed::RunSummary`]; they never abort a run.
//!
//! ## Quick Start
//!
//! ```bash
//! seed run                         # defaults: 1000 docs, batches of 250
//! seed run --profile extended      # wider pools, extra traps, wipes first
//! seed generate --out corpus.json  # no network
//! seed count
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | The document type |
//! | [`dates`] | Timestamp generation and formatting |
//! | [`schema`] | Field declarations and provisioning |
//! | [`index`] | Search index client |
//! | [`profile`] | Value pools and catalog selection |
//! | [`golden`] | Golden record catalog |
//! | [`noise`] | Random documents |
//! | [`loader`] | Batched bulk writes |
//! | [`seed`] | Run orchestration |
//! | [`export`] | Offline corpus export |
//! | [`progress`] | Progress reporting |

pub mod config;
pub mod dates;
pub mod export;
pub mod golden;
pub mod index;
pub mod loader;
pub mod models;
pub mod noise;
pub mod profile;
pub mod progress;
pub mod schema;
pub mod seed;
