//! Corpus-wide totals shown above the agency table.
//!
//! Only top-level entities are counted; child rows never contribute to
//! either figure. Orphans (dangling `parent_id`) are top-level and count.
//!
//! The backend reports `avg_rscs = 0` for entities with no scored sections,
//! so the average only takes entities with a non-zero, finite score. When
//! none qualify the average is `0.0`.

use serde::Serialize;

use crate::hierarchy::Hierarchy;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorpusSummary {
    /// Sum of `total_words` over top-level entities.
    pub total_words: u64,
    /// Simple (unweighted) mean of the scored top-level `avg_rscs` values.
    pub avg_rscs: f64,
    /// Top-level entities summed into `total_words`.
    pub counted: usize,
    /// Top-level entities that carried a score into `avg_rscs`.
    pub scored: usize,
}

impl CorpusSummary {
    pub fn from_hierarchy(hierarchy: &Hierarchy<'_>) -> Self {
        let top = hierarchy.top_level();
        let total_words = top.iter().map(|e| e.total_words).sum();
        let scores: Vec<f64> = top
            .iter()
            .map(|e| e.avg_rscs)
            .filter(|s| s.is_finite() && *s != 0.0)
            .collect();
        let avg_rscs = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        Self {
            total_words,
            avg_rscs,
            counted: top.len(),
            scored: scores.len(),
        }
    }

    /// `"3,000 words"`.
    pub fn words_label(&self) -> String {
        format!("{} words", format_number(self.total_words))
    }

    /// `"15.0 per 1,000 words"`.
    pub fn rscs_label(&self) -> String {
        format!("{} per 1,000 words", format_score(self.avg_rscs))
    }
}

/// Thousands-separated integer: `1234567` → `"1,234,567"`.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Score with one decimal place: `15.0`, `0.0`, `12.3`.
pub fn format_score(score: f64) -> String {
    if score.is_finite() {
        format!("{:.1}", score)
    } else {
        "0.0".to_string()
    }
}
