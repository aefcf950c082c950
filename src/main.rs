//! # RSCS Dashboard CLI (`rscs`)
//!
//! Browse regulation complexity (RSCS) by agency, title, and section from
//! the terminal.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rscs agencies` | Agency table with corpus totals |
//! | `rscs title <t>` | One CFR title's totals and summary |
//! | `rscs section <id>` | One section's text, score, and summary |
//! | `rscs summaries` | Generated plain-language summaries |
//! | `rscs explain` | What the RSCS metric means |
//! | `rscs browse` | Interactive session over the agency table |
//!
//! ## Examples
//!
//! ```bash
//! # Agencies for title 40, sorted by name descending, with checksums
//! rscs agencies --title 40 --sort name --checksum
//!
//! # Same column twice flips to ascending
//! rscs agencies --sort name --sort name
//!
//! # Point at a different backend
//! RSCS_API_URL=https://rscs.example.org/api rscs title 40
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rscs_dashboard::browse;
use rscs_dashboard::client::ApiClient;
use rscs_dashboard::config::{self, Config};
use rscs_dashboard::dashboard::{Dashboard, LoadState};
use rscs_dashboard::detail;
use rscs_dashboard::explainer::ExplainerStore;
use rscs_dashboard::logging;
use rscs_dashboard::models::{EntityId, SummaryKind};
use rscs_dashboard::render;
use rscs_dashboard::sort::{SortField, SortState};

/// RSCS Dashboard CLI: browse federal regulation complexity by agency,
/// title, and section.
#[derive(Parser)]
#[command(
    name = "rscs",
    about = "RSCS Dashboard: browse federal regulation complexity by agency, title, and section",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/rscs.toml`. A missing file means built-in
    /// defaults (backend at http://localhost:8080/api).
    #[arg(long, global = true, default_value = "./config/rscs.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the agency table.
    ///
    /// Rows are departments; sub-agencies appear under their department
    /// when expanded. Totals count departments only.
    Agencies {
        /// Only count words and scores from this CFR title.
        #[arg(long)]
        title: Option<u32>,

        /// Fetch and show content checksums.
        #[arg(long)]
        checksum: bool,

        /// Column header click: `name`, `total_words`, `avg_rscs`, `lsa_counts`.
        /// Repeat to click again; the same column twice flips direction.
        #[arg(long)]
        sort: Vec<SortField>,

        /// Expand the row with this id. Repeatable.
        #[arg(long)]
        expand: Vec<EntityId>,

        /// Expand every row that has sub-agencies.
        #[arg(long)]
        expand_all: bool,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show one CFR title.
    Title {
        /// Title number, e.g. `40`.
        title: String,

        #[arg(long)]
        json: bool,
    },

    /// Show one section.
    Section {
        /// Section identifier.
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// List generated summaries.
    Summaries {
        /// Only `agency`, `title`, or `section` summaries.
        #[arg(long)]
        kind: Option<SummaryKind>,

        #[arg(long)]
        json: bool,
    },

    /// Explain the RSCS metric.
    Explain,

    /// Interactive session: sort, expand, filter, and open the explainer.
    Browse {
        #[arg(long)]
        title: Option<u32>,

        #[arg(long)]
        checksum: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Needs no backend or config
    if let Commands::Explain = cli.command {
        print!("{}", render::render_explainer());
        return Ok(());
    }

    let cfg = config::load_config_or_default(&cli.config)?;
    logging::init(cfg.logging.format);
    if !cli.config.exists() {
        tracing::debug!(path = %cli.config.display(), "config file not found, using defaults");
    }
    let client = ApiClient::from_config(&cfg)?;

    match cli.command {
        Commands::Agencies {
            title,
            checksum,
            sort,
            expand,
            expand_all,
            json,
        } => {
            let mut dashboard = new_dashboard(&cfg, title, checksum);
            for field in sort {
                dashboard.set_sort_key(field);
            }
            dashboard.refresh(&client).await;
            for id in expand {
                dashboard.toggle_expanded(id);
            }
            if expand_all {
                dashboard.expand_all();
            }

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&render::dashboard_json(&dashboard))?
                );
            } else {
                print!("{}", render::render_dashboard(&dashboard));
            }
            if let LoadState::Failed(_) = dashboard.load_state() {
                std::process::exit(1);
            }
        }
        Commands::Title { title, json } => {
            let Some(detail) = detail::load_title(&client, &title).await else {
                std::process::exit(1);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{}", render::render_title(&title, &detail));
            }
        }
        Commands::Section { id, json } => {
            let Some(detail) = detail::load_section(&client, &id).await else {
                std::process::exit(1);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{}", render::render_section(&detail));
            }
        }
        Commands::Summaries { kind, json } => {
            let mut records = match client.list_summaries().await {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            if let Some(kind) = kind {
                records.retain(|r| r.kind == kind);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", render::render_summaries(&records));
            }
        }
        Commands::Browse { title, checksum } => {
            let mut dashboard = new_dashboard(&cfg, title, checksum);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let prompt = atty::is(atty::Stream::Stdin);
            browse::run_session(
                &mut dashboard,
                &client,
                stdin,
                &mut std::io::stdout(),
                prompt,
            )
            .await?;
        }
        Commands::Explain => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

fn new_dashboard(cfg: &Config, title: Option<u32>, checksum: bool) -> Dashboard {
    let mut dashboard = Dashboard::new(
        SortState::new(cfg.table.default_sort),
        ExplainerStore::provide(),
    );
    dashboard.set_title_filter(title);
    dashboard.set_include_checksum(checksum || cfg.table.include_checksum);
    dashboard
}
