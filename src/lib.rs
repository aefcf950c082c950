//! # RSCS Dashboard
//!
//! A terminal client for browsing federal regulations by their Regulatory
//! Section Complexity Score (RSCS), served by the RSCS backend's JSON API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────────────┐
//! │  ApiClient  │──▶│ flat [Entity]│──▶│ Hierarchy ─▶ SortState│──▶ rows
//! │  (reqwest)  │   │  (Dashboard) │   │ CorpusSummary        │
//! └─────────────┘   └─────────────┘   └──────────────────────┘
//!                          │                 ▲
//!                          ▼                 │ ExpandState gates children
//!                   ┌──────────────┐
//!                   │ExplainerStore│  shared by header / nav / card triggers
//!                   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rscs agencies --title 40 --sort name --expand 1
//! rscs title 40
//! rscs section 1.1
//! rscs browse
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`error`] | Backend fetch errors |
//! | [`models`] | Backend payload types |
//! | [`client`] | HTTP client for the backend |
//! | [`hierarchy`] | Two-level parent/child grouping |
//! | [`sort`] | Table column sorting |
//! | [`expand`] | Expanded-row tracking |
//! | [`summary`] | Corpus totals and number formatting |
//! | [`explainer`] | Shared explainer visibility store |
//! | [`dashboard`] | Page-level controller |
//! | [`render`] | Text and JSON rendering |
//! | [`detail`] | Title and section detail loaders |
//! | [`browse`] | Interactive session |

pub mod browse;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod expand;
pub mod explainer;
pub mod hierarchy;
pub mod logging;
pub mod models;
pub mod render;
pub mod sort;
pub mod summary;
