#![forbid(unsafe_code)]

//! Opportunity records and the valuation projection shown in the drawer.
//!
//! Records are typed at the boundary: anything that arrives as loose strings
//! ([`RawRecord`]) must pass through [`OpportunityRecord::try_from`] before the
//! dashboard sees it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a discovered asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Abandoned code (stale branches, deprecated services, dead dependencies).
    GithubZombie,
    /// Hidden or undocumented endpoints.
    ChromeGhost,
}

impl Category {
    pub const ALL: &'static [Category] = &[Category::GithubZombie, Category::ChromeGhost];

    /// Wire tag used in JSON payloads.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::GithubZombie => "github_zombie",
            Self::ChromeGhost => "chrome_ghost",
        }
    }

    /// Badge text shown on cards.
    pub const fn label(self) -> &'static str {
        match self {
            Self::GithubZombie => "Zombie Code",
            Self::ChromeGhost => "Ghost API",
        }
    }

    /// Parse a wire tag. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.tag() == tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One discovered opportunity, as rendered on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    /// Identifier, unique within one scan batch.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Estimated price. Free text, not a currency amount.
    pub price: String,
    /// Estimated benefit. Free text.
    pub revenue: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub details: String,
}

impl OpportunityRecord {
    /// Project this record into the drawer's valuation slot.
    pub fn to_valuation(&self) -> SelectedValuation {
        SelectedValuation {
            title: self.title.clone(),
            valuation: self.price.clone(),
            reasoning: self.description.clone(),
            details: self.details.clone(),
        }
    }
}

/// Untyped record as it arrives from a JSON file or other loose source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub revenue: String,
    #[serde(rename = "type")]
    pub category: String,
    pub details: String,
}

/// Reasons a [`RawRecord`] cannot become an [`OpportunityRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The category tag is not one of the known tags.
    UnknownCategory(String),
    /// A required field is empty.
    MissingField {
        id: String,
        field: &'static str,
    },
    /// Two records in the same batch share an identifier.
    DuplicateId(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::UnknownCategory(tag) => write!(f, "unknown category tag: {tag:?}"),
            RecordError::MissingField { id, field } => {
                write!(f, "record {id:?} is missing required field `{field}`")
            }
            RecordError::DuplicateId(id) => write!(f, "duplicate record id in batch: {id:?}"),
        }
    }
}

impl std::error::Error for RecordError {}

impl TryFrom<RawRecord> for OpportunityRecord {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(RecordError::MissingField {
                id: raw.id,
                field: "id",
            });
        }
        if raw.title.trim().is_empty() {
            return Err(RecordError::MissingField {
                id: raw.id,
                field: "title",
            });
        }
        let category =
            Category::from_tag(&raw.category).ok_or(RecordError::UnknownCategory(raw.category))?;
        Ok(Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            price: raw.price,
            revenue: raw.revenue,
            category,
            details: raw.details,
        })
    }
}

/// The drawer's single-slot projection of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedValuation {
    pub title: String,
    pub valuation: String,
    pub reasoning: String,
    pub details: String,
}
