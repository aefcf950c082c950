//! Terminal and JSON rendering for the dashboard views.
//!
//! Renderers return `String`s so callers decide where output goes; the CLI
//! prints them to stdout.

use serde_json::json;

use crate::dashboard::{Dashboard, LoadState, Row, RowKind};
use crate::explainer::EXPLAINER_TITLE;
use crate::models::{SectionDetail, SummaryRecord, TitleDetail};
use crate::sort::SortField;
use crate::summary::{format_number, format_score};

pub const LOADING_TEXT: &str = "Loading agency data...";

const CHECKSUM_PREFIX_LEN: usize = 8;

/// Shorten a checksum to its first eight characters plus `...`.
pub fn truncate_checksum(checksum: &str) -> String {
    if checksum.chars().count() > CHECKSUM_PREFIX_LEN {
        let prefix: String = checksum.chars().take(CHECKSUM_PREFIX_LEN).collect();
        format!("{}...", prefix)
    } else {
        checksum.to_string()
    }
}

/// Full agency page: status, summary cards, optional explainer, table.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    match dashboard.load_state() {
        LoadState::Loading => return format!("{}\n", LOADING_TEXT),
        LoadState::Failed(message) => return format!("Error: {}\n", message),
        LoadState::Ready => {}
    }

    let mut out = String::new();
    let query = dashboard.query();
    out.push_str("eCFR Dashboard — Agencies\n");
    out.push_str(&format!(
        "Title filter: {}   Checksums: {}\n\n",
        query
            .title
            .map(|t| format!("Title {}", t))
            .unwrap_or_else(|| "all titles".to_string()),
        if query.include_checksum { "on" } else { "off" }
    ));

    let summary = dashboard.summary();
    out.push_str(&format!("Total Words: {}\n", summary.words_label()));
    out.push_str(&format!("Average RSCS: {}\n", summary.rscs_label()));
    out.push('\n');

    if dashboard.explainer().is_visible() {
        out.push_str(&render_explainer());
        out.push('\n');
    }

    let rows = dashboard.rows();
    if rows.is_empty() {
        out.push_str("No agencies found.\n");
        return out;
    }
    out.push_str(&render_table(dashboard, &rows));
    out
}

fn render_table(dashboard: &Dashboard, rows: &[Row<'_>]) -> String {
    let sort = dashboard.sort();
    let with_checksum = dashboard.query().include_checksum;

    let mut header: Vec<String> = SortField::ALL
        .iter()
        .map(|field| {
            if *field == sort.field {
                format!("{} {}", field.heading(), sort.direction.arrow())
            } else {
                field.heading().to_string()
            }
        })
        .collect();
    if with_checksum {
        header.push("Checksum".to_string());
    }

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let e = row.entity;
            let marker = match row.kind {
                RowKind::Parent {
                    has_children: true,
                    expanded: true,
                } => "▾ ",
                RowKind::Parent {
                    has_children: true,
                    expanded: false,
                } => "▸ ",
                RowKind::Parent { .. } => "  ",
                RowKind::Child { .. } => "    └ ",
            };
            let mut cells = vec![
                format!("{}{} [{}]", marker, e.name, e.id),
                format_number(e.total_words),
                format_score(e.avg_rscs),
                e.lsa_counts
                    .map(format_number)
                    .unwrap_or_else(|| "-".to_string()),
            ];
            if with_checksum {
                cells.push(
                    e.content_checksum
                        .as_deref()
                        .filter(|c| !c.is_empty())
                        .map(truncate_checksum)
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            body.iter()
                .map(|cells| cells[col].chars().count())
                .chain(std::iter::once(header[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format_line(&header, &widths));
    out.push_str(&format_line(
        &widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>(),
        &widths,
    ));
    for cells in &body {
        out.push_str(&format_line(cells, &widths));
    }
    out
}

/// First column left-aligned, numeric columns right-aligned.
fn format_line(cells: &[String], widths: &[usize]) -> String {
    let parts: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == 0 || i == 4 {
                format!("{:<width$}", cell, width = width)
            } else {
                format!("{:>width$}", cell, width = width)
            }
        })
        .collect();
    format!("{}\n", parts.join("  ").trim_end())
}

/// Machine-readable dashboard for `--json`.
pub fn dashboard_json(dashboard: &Dashboard) -> serde_json::Value {
    let (state, error) = match dashboard.load_state() {
        LoadState::Loading => ("loading", None),
        LoadState::Ready => ("ready", None),
        LoadState::Failed(message) => ("error", Some(message.clone())),
    };
    json!({
        "state": state,
        "error": error,
        "query": {
            "title": dashboard.query().title,
            "include_checksum": dashboard.query().include_checksum,
        },
        "sort": dashboard.sort(),
        "summary": dashboard.summary(),
        "rows": dashboard.rows(),
    })
}

pub fn render_title(title: &str, detail: &TitleDetail) -> String {
    let mut out = String::new();
    let label = detail.title.clone().unwrap_or_else(|| format!("Title {}", title));
    out.push_str(&format!("{}\n", label));
    out.push_str(&format!(
        "  Total Words:     {}\n",
        format_number(detail.total_words)
    ));
    out.push_str(&format!(
        "  Avg. RSCS Score: {} per 1,000 words\n",
        format_score(detail.avg_rscs)
    ));
    if let Some(summary) = detail.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str("\nSummary\n");
        out.push_str(&indent(summary));
    }
    out
}

pub fn render_section(detail: &SectionDetail) -> String {
    let mut out = String::new();
    let heading = if detail.section.starts_with('§') {
        detail.section.clone()
    } else {
        format!("§ {}", detail.section)
    };
    match &detail.title {
        Some(title) => out.push_str(&format!("Section {} (Title {})\n", heading, title)),
        None => out.push_str(&format!("Section {}\n", heading)),
    }
    out.push_str(&format!(
        "  RSCS: {} per 1,000 words\n",
        format_score(detail.rscs_per_1k)
    ));
    if let Some(summary) = detail.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str("\nSummary\n");
        out.push_str(&indent(summary));
    }
    out.push_str("\nText\n");
    out.push_str(&indent(&detail.text));
    out
}

pub fn render_summaries(records: &[SummaryRecord]) -> String {
    if records.is_empty() {
        return "No summaries.\n".to_string();
    }
    let mut out = String::new();
    for r in records {
        out.push_str(&format!(
            "[{} {}] {} ({})\n",
            r.kind,
            r.key,
            r.created_at.format("%Y-%m-%d"),
            if r.model.is_empty() {
                "unknown model"
            } else {
                r.model.as_str()
            }
        ));
        out.push_str(&indent(&r.text));
        out.push('\n');
    }
    out
}

/// The RSCS explainer body.
pub fn render_explainer() -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", EXPLAINER_TITLE));
    out.push_str(&"=".repeat(EXPLAINER_TITLE.chars().count()));
    out.push('\n');
    out.push_str(
        "RSCS (Regulatory Section Complexity Score) estimates how hard a piece of\n\
         regulation is to read and comply with, normalized per 1,000 words so\n\
         short and long sections compare fairly.\n\n\
         For each section:\n\
         \x20 raw score  = words + 20 x definitions + 50 x cross-references\n\
         \x20              + 100 x modal obligations (shall, must, may not, ...)\n\
         \x20 RSCS per 1K = 1,000 x raw score / words\n\n\
         Agency and title figures average their sections' scores. A score of\n\
         0.0 means no sections were scored; the corpus average leaves those\n\
         out. Higher is more complex.\n",
    );
    out
}

fn indent(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::explainer::{ControlId, ExplainerStore, FocusHost, Trigger};
    use crate::models::{Entity, EntityId};
    use crate::sort::SortState;

    struct NoFocus;

    impl FocusHost for NoFocus {
        fn active_control(&self) -> Option<ControlId> {
            None
        }
        fn focus(&mut self, _control: &ControlId) {}
    }

    fn entity(id: i64, name: &str, parent: Option<i64>, words: u64, rscs: f64) -> Entity {
        Entity {
            id: EntityId::from(id),
            name: name.to_string(),
            total_words: words,
            avg_rscs: rscs,
            parent_id: parent.map(EntityId::from),
            content_checksum: None,
            lsa_counts: Some(5),
        }
    }

    fn loaded(entities: Vec<Entity>) -> Dashboard {
        let mut d = Dashboard::new(SortState::default(), ExplainerStore::provide());
        let ticket = d.begin_fetch();
        d.apply_fetch(ticket, Ok(entities));
        d
    }

    #[test]
    fn truncates_long_checksums() {
        assert_eq!(truncate_checksum("abcdef123456"), "abcdef12...");
        assert_eq!(truncate_checksum("abc"), "abc");
        assert_eq!(truncate_checksum("abcdefgh"), "abcdefgh");
    }

    #[test]
    fn loading_and_error_states() {
        let mut d = Dashboard::new(SortState::default(), ExplainerStore::provide());
        let ticket = d.begin_fetch();
        assert_eq!(render_dashboard(&d), "Loading agency data...\n");

        d.apply_fetch(
            ticket,
            Err(FetchError::InvalidUrl {
                endpoint: "agencies".into(),
                reason: "Network error".into(),
            }),
        );
        let text = render_dashboard(&d);
        assert!(text.starts_with("Error: "));
        assert!(text.contains("Network error"));
    }

    #[test]
    fn renders_summary_and_rows() {
        let d = loaded(vec![
            entity(1, "Dept A", None, 1000, 10.0),
            entity(2, "Dept B", None, 2000, 20.0),
        ]);
        let text = render_dashboard(&d);
        assert!(text.contains("3,000 words"));
        assert!(text.contains("15.0 per 1,000"));
        assert!(text.contains("Dept A"));
        assert!(text.contains("Total Words ▼"));
        let b = text.find("Dept B").unwrap();
        let a = text.find("Dept A").unwrap();
        assert!(b < a);
    }

    #[test]
    fn zero_average_renders() {
        let d = loaded(vec![entity(1, "Dept A", None, 1000, 0.0)]);
        assert!(render_dashboard(&d).contains("Average RSCS: 0.0"));
    }

    #[test]
    fn child_rows_only_when_expanded() {
        let mut d = loaded(vec![
            entity(1, "Dept A", None, 1000, 10.0),
            entity(2, "Agency B", Some(1), 500, 5.0),
        ]);
        assert!(!render_dashboard(&d).contains("Agency B"));
        d.toggle_expanded(EntityId::from(1));
        let text = render_dashboard(&d);
        assert!(text.contains("└ Agency B"));
        assert!(text.contains("▾ Dept A"));
    }

    #[test]
    fn checksum_column_follows_query() {
        let mut e = entity(1, "Dept A", None, 1000, 10.0);
        e.content_checksum = Some("abcdef123456".into());
        let mut d = loaded(vec![e]);
        assert!(!render_dashboard(&d).contains("abcdef12..."));
        d.set_include_checksum(true);
        let text = render_dashboard(&d);
        assert!(text.contains("Checksum"));
        assert!(text.contains("abcdef12..."));
    }

    #[test]
    fn explainer_shown_when_open() {
        let d = loaded(vec![]);
        assert!(!render_dashboard(&d).contains(EXPLAINER_TITLE));
        d.activate_trigger(Trigger::TableHeader, &NoFocus);
        let text = render_dashboard(&d);
        assert!(text.contains(EXPLAINER_TITLE));
        assert!(text.contains("No agencies found."));
    }

    #[test]
    fn json_view_carries_rows_and_summary() {
        let d = loaded(vec![entity(1, "Dept A", None, 1000, 10.0)]);
        let v = dashboard_json(&d);
        assert_eq!(v["state"], "ready");
        assert_eq!(v["summary"]["total_words"], 1000);
        assert_eq!(v["rows"][0]["entity"]["name"], "Dept A");
        assert_eq!(v["sort"]["field"], "total_words");
        assert_eq!(v["sort"]["direction"], "descending");
    }

    #[test]
    fn title_and_section_views() {
        let t = TitleDetail {
            id: None,
            title: None,
            total_words: 5000,
            avg_rscs: 12.5,
            summary: Some("Title summary here.".into()),
        };
        let text = render_title("40", &t);
        assert!(text.contains("Title 40"));
        assert!(text.contains("5,000"));
        assert!(text.contains("Avg. RSCS"));
        assert!(text.contains("12.5"));
        assert!(text.contains("Title summary here"));

        let s = SectionDetail {
            id: None,
            title: Some("40".into()),
            section: "123".into(),
            text: "Sample text content".into(),
            rscs_per_1k: 10.5,
            summary: None,
        };
        let text = render_section(&s);
        assert!(text.contains("§ 123"));
        assert!(text.contains("Sample text"));
        assert!(text.contains("10.5"));
    }
}
