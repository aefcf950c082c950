//! Core data models returned by the RSCS backend.
//!
//! These types mirror the JSON payloads of the `/api/agencies`,
//! `/api/titles/{t}`, `/api/sections/{id}` and `/api/summaries` endpoints.
//! The list collection is always replaced wholesale on fetch, so nothing here
//! carries mutable state.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of an [`Entity`], unique within one fetched collection.
///
/// An opaque key: the backend sends agency slugs (`"agriculture-department"`)
/// or numbers, and both are only ever compared for equality. Numbers are kept
/// in their decimal form, so `7` and `"7"` name the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("entity id must not be empty".to_string());
        }
        Ok(EntityId(trimmed.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl RawId {
    /// `None` for an empty or blank string.
    fn into_id(self) -> Option<EntityId> {
        match self {
            RawId::Number(n) => Some(EntityId(n.to_string())),
            RawId::Text(s) => s.parse().ok(),
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer)?
            .into_id()
            .ok_or_else(|| de::Error::custom("entity id must not be empty"))
    }
}

/// `null`, a missing field and an empty string all mean "no parent".
fn deserialize_parent<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<EntityId>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.and_then(RawId::into_id))
}

/// Display labels may arrive as numbers (`40`) or strings (`"40"`).
fn deserialize_label<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// One row of the agency table: an agency, title, or similarly shaped record.
///
/// Parent/child linkage is a derived relation: see
/// [`Hierarchy`](crate::hierarchy::Hierarchy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_words: u64,
    /// RSCS per 1,000 words. The backend sends `0` when nothing was scored.
    #[serde(default)]
    pub avg_rscs: f64,
    #[serde(default, deserialize_with = "deserialize_parent")]
    pub parent_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsa_counts: Option<u64>,
}

/// Title detail served by `GET /api/titles/{t}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetail {
    #[serde(default, deserialize_with = "deserialize_label")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub title: Option<String>,
    #[serde(default)]
    pub total_words: u64,
    #[serde(default)]
    pub avg_rscs: f64,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Section detail served by `GET /api/sections/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDetail {
    #[serde(default, deserialize_with = "deserialize_label")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_label")]
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_required_label")]
    pub section: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rscs_per_1k: f64,
    #[serde(default)]
    pub summary: Option<String>,
}

fn deserialize_required_label<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    deserialize_label(deserializer)?.ok_or_else(|| de::Error::custom("section label is null"))
}

/// What a generated summary describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Agency,
    Title,
    Section,
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryKind::Agency => write!(f, "agency"),
            SummaryKind::Title => write!(f, "title"),
            SummaryKind::Section => write!(f, "section"),
        }
    }
}

impl std::str::FromStr for SummaryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agency" => Ok(SummaryKind::Agency),
            "title" => Ok(SummaryKind::Title),
            "section" => Ok(SummaryKind::Section),
            other => Err(format!(
                "unknown summary kind: '{}'. Use agency, title, or section.",
                other
            )),
        }
    }
}

/// A model-generated plain-language summary served by `GET /api/summaries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub kind: SummaryKind,
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub model: String,
    pub created_at: DateTime<Utc>,
}
