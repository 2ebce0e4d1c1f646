//! Wire schema and the translation boundary.
//!
//! The backend speaks snake_case records with nullable fields and loose
//! status strings. Everything entering the domain passes through the
//! translators here: absent optionals become empty strings or vectors
//! (never `None` past this boundary), tags are deduplicated, and status
//! strings are normalised fail-open. Partial updates travel the other way
//! as patch records that serialise only the keys that were touched.
//!
//! # Renaming table
//!
//! | wire                       | domain              |
//! |----------------------------|---------------------|
//! | `law_name`                 | `name` (library)    |
//! | `full_text`                | `law_text`          |
//! | `authoritative_source_url` | `authoritative_url` |
//! | `title`                    | `name` (rule)       |
//! | `owner_user_id`            | `owner`             |
//! | `source_url`               | `authoritative_url` |
//! | `classification`           | `category`          |
//! | `status`                   | `status` / `review_status` |

use serde::{Deserialize, Serialize};

use crate::model::{Dtl, DtLib, LibStatus, ReviewStatus};

/// Statute library as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtLibWire {
    pub id: String,
    pub law_name: String,
    pub law_identifier: String,
    pub jurisdiction: String,
    pub version: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub authoritative_source_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Legal rule as the backend stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtlWire {
    pub id: String,
    pub dtlib_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_user_id: Option<i64>,
    pub version: String,
    pub legal_text: String,
    pub legal_reference: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl DtLib {
    pub fn from_wire(wire: DtLibWire) -> Self {
        Self {
            id: wire.id,
            name: wire.law_name,
            law_identifier: wire.law_identifier,
            jurisdiction: wire.jurisdiction,
            version: wire.version,
            status: LibStatus::normalize(wire.status.as_deref()),
            effective_date: wire.effective_date.unwrap_or_default(),
            law_text: wire.full_text.unwrap_or_default(),
            authoritative_url: wire.authoritative_source_url.unwrap_or_default(),
            description: wire.description.unwrap_or_default(),
        }
    }

    pub fn to_wire(&self) -> DtLibWire {
        DtLibWire {
            id: self.id.clone(),
            law_name: self.name.clone(),
            law_identifier: self.law_identifier.clone(),
            jurisdiction: self.jurisdiction.clone(),
            version: self.version.clone(),
            status: Some(self.status.as_str().to_string()),
            effective_date: Some(self.effective_date.clone()),
            full_text: Some(self.law_text.clone()),
            authoritative_source_url: Some(self.authoritative_url.clone()),
            description: Some(self.description.clone()),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Dtl {
    pub fn from_wire(wire: DtlWire) -> Self {
        Self {
            id: wire.id,
            dtlib_id: wire.dtlib_id,
            name: wire.title,
            description: wire.description.unwrap_or_default(),
            owner: wire.owner_user_id,
            version: wire.version,
            legal_text: wire.legal_text,
            legal_reference: wire.legal_reference,
            authoritative_url: wire.source_url.unwrap_or_default(),
            category: wire.classification.unwrap_or_default(),
            tags: dedup_tags(wire.tags.unwrap_or_default()),
            review_status: ReviewStatus::normalize(wire.status.as_deref()),
            // The wire carries no comment field; comments live in the
            // review comment log and are merged in by the session.
            review_comments: String::new(),
        }
    }

    pub fn to_wire(&self) -> DtlWire {
        DtlWire {
            id: self.id.clone(),
            dtlib_id: self.dtlib_id.clone(),
            title: self.name.clone(),
            description: Some(self.description.clone()),
            owner_user_id: self.owner,
            version: self.version.clone(),
            legal_text: self.legal_text.clone(),
            legal_reference: self.legal_reference.clone(),
            source_url: Some(self.authoritative_url.clone()),
            classification: Some(self.category.clone()),
            tags: Some(self.tags.clone()),
            status: Some(self.review_status.as_str().to_string()),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Drop duplicate tags, keeping the first occurrence in order.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

/// Payload for creating a statute library.
#[derive(Debug, Clone, Default)]
pub struct NewDtLib {
    pub name: String,
    pub law_identifier: String,
    pub jurisdiction: String,
    pub version: String,
    pub effective_date: Option<String>,
    pub law_text: Option<String>,
    pub authoritative_url: Option<String>,
    pub description: Option<String>,
    pub status: Option<LibStatus>,
}

/// Wire form of [`NewDtLib`].
#[derive(Debug, Clone, Serialize)]
pub struct NewDtLibWire {
    pub law_name: String,
    pub law_identifier: String,
    pub jurisdiction: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authoritative_source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl NewDtLib {
    pub fn to_wire(&self) -> NewDtLibWire {
        NewDtLibWire {
            law_name: self.name.clone(),
            law_identifier: self.law_identifier.clone(),
            jurisdiction: self.jurisdiction.clone(),
            version: self.version.clone(),
            effective_date: self.effective_date.clone(),
            full_text: self.law_text.clone(),
            authoritative_source_url: self.authoritative_url.clone(),
            description: self.description.clone(),
            status: self.status.map(|s| s.as_str().to_string()),
        }
    }
}

/// Payload for creating a legal rule, typically seeded from a
/// segmentation suggestion.
#[derive(Debug, Clone, Default)]
pub struct NewDtl {
    pub name: String,
    pub legal_text: String,
    pub legal_reference: String,
    pub description: Option<String>,
    pub owner: Option<i64>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub version: Option<String>,
}

/// Wire form of [`NewDtl`].
#[derive(Debug, Clone, Serialize)]
pub struct NewDtlWire {
    pub title: String,
    pub legal_text: String,
    pub legal_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl NewDtl {
    pub fn to_wire(&self) -> NewDtlWire {
        NewDtlWire {
            title: self.name.clone(),
            legal_text: self.legal_text.clone(),
            legal_reference: self.legal_reference.clone(),
            description: self.description.clone(),
            owner_user_id: self.owner,
            classification: self.category.clone(),
            tags: self.tags.clone(),
            version: self.version.clone(),
        }
    }
}

/// Partial update for a statute library; unset fields are not emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DtLibPatch {
    pub name: Option<String>,
    pub law_identifier: Option<String>,
    pub jurisdiction: Option<String>,
    pub version: Option<String>,
    pub status: Option<LibStatus>,
    pub effective_date: Option<String>,
    pub law_text: Option<String>,
    pub authoritative_url: Option<String>,
    pub description: Option<String>,
}

/// Wire form of [`DtLibPatch`]: only touched keys serialise.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DtLibWirePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authoritative_source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DtLibPatch {
    pub fn to_wire(&self) -> DtLibWirePatch {
        DtLibWirePatch {
            law_name: self.name.clone(),
            law_identifier: self.law_identifier.clone(),
            jurisdiction: self.jurisdiction.clone(),
            version: self.version.clone(),
            status: self.status.map(|s| s.as_str().to_string()),
            effective_date: self.effective_date.clone(),
            full_text: self.law_text.clone(),
            authoritative_source_url: self.authoritative_url.clone(),
            description: self.description.clone(),
        }
    }
}

/// Partial update for a legal rule; unset fields are not emitted.
///
/// `review_status` may only be set by the review aggregator's approve and
/// request-revision paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DtlPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<i64>,
    pub version: Option<String>,
    pub legal_text: Option<String>,
    pub legal_reference: Option<String>,
    pub authoritative_url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub review_status: Option<ReviewStatus>,
}

/// Wire form of [`DtlPatch`]: only touched keys serialise.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DtlWirePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl DtlPatch {
    pub fn to_wire(&self) -> DtlWirePatch {
        DtlWirePatch {
            title: self.name.clone(),
            description: self.description.clone(),
            owner_user_id: self.owner,
            version: self.version.clone(),
            legal_text: self.legal_text.clone(),
            legal_reference: self.legal_reference.clone(),
            source_url: self.authoritative_url.clone(),
            classification: self.category.clone(),
            tags: self.tags.clone(),
            status: self.review_status.map(|s| s.as_str().to_string()),
        }
    }
}
