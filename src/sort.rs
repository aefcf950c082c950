//! Column sorting for the agency table.
//!
//! Header clicks go through [`SortState::set_sort_key`]: clicking the
//! active column flips its direction, clicking another column selects it
//! descending. Sorting is stable and applies to top-level rows only; child
//! rows keep fetch order under their parent.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::models::Entity;

/// A sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    TotalWords,
    AvgRscs,
    LsaCounts,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Name,
        SortField::TotalWords,
        SortField::AvgRscs,
        SortField::LsaCounts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::TotalWords => "total_words",
            SortField::AvgRscs => "avg_rscs",
            SortField::LsaCounts => "lsa_counts",
        }
    }

    /// Column heading shown in the table.
    pub fn heading(&self) -> &'static str {
        match self {
            SortField::Name => "Agency",
            SortField::TotalWords => "Total Words",
            SortField::AvgRscs => "RSCS per 1K",
            SortField::LsaCounts => "LSA Activity",
        }
    }

    fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::TotalWords => a.total_words.cmp(&b.total_words),
            SortField::AvgRscs => a.avg_rscs.total_cmp(&b.avg_rscs),
            SortField::LsaCounts => a.lsa_counts.unwrap_or(0).cmp(&b.lsa_counts.unwrap_or(0)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown sort field: '{}'. Use name, total_words, avg_rscs, or lsa_counts.",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortField::TotalWords)
    }
}

impl SortState {
    /// Sort by `field`, descending.
    pub fn new(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Handle a header click on `field`.
    pub fn set_sort_key(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Descending;
        }
    }

    /// Stable in-place sort. Equal keys keep their relative order in both
    /// directions.
    pub fn sort(&self, rows: &mut [&Entity]) {
        let field = self.field;
        match self.direction {
            SortDirection::Ascending => rows.sort_by(|a, b| field.compare(a, b)),
            SortDirection::Descending => rows.sort_by(|a, b| field.compare(b, a)),
        }
    }
}
