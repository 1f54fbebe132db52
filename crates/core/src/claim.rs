//! Claim domain types.
//!
//! A claim is created once at session start from raw user input (text or an
//! article URL), optionally refined by the extraction capability, and is
//! immutable for the rest of the session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of the news claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimCategory {
    Politics,
    Health,
    Economy,
    Science,
    #[default]
    Other,
}

impl std::fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClaimCategory::Politics => "politics",
            ClaimCategory::Health => "health",
            ClaimCategory::Economy => "economy",
            ClaimCategory::Science => "science",
            ClaimCategory::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// Entities extracted from the claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub people: Vec<String>,

    #[serde(default)]
    pub places: Vec<String>,

    #[serde(default)]
    pub dates: Vec<String>,

    #[serde(default)]
    pub organizations: Vec<String>,
}

impl Entities {
    /// Total number of extracted entities across all kinds.
    pub fn count(&self) -> usize {
        self.people.len() + self.places.len() + self.dates.len() + self.organizations.len()
    }
}

/// The claim under verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique claim ID
    pub id: Uuid,

    /// The original text (or URL) supplied by the caller
    pub raw_input: String,

    /// The distilled single-sentence verifiable assertion
    pub core_claim: String,

    /// Entities mentioned in the claim
    #[serde(default)]
    pub entities: Entities,

    /// Category tag
    #[serde(default)]
    pub category: ClaimCategory,
}

impl Claim {
    /// Create a claim straight from raw input, with no distillation yet.
    pub fn from_raw(raw_input: impl Into<String>) -> Self {
        let raw_input = raw_input.into();
        Self {
            id: Uuid::new_v4(),
            core_claim: raw_input.clone(),
            raw_input,
            entities: Entities::default(),
            category: ClaimCategory::Other,
        }
    }

    /// Whether the distilled assertion is still missing or identical to the
    /// raw input. The extract node runs only when this returns true, which
    /// makes it idempotent.
    pub fn needs_extraction(&self) -> bool {
        self.core_claim.is_empty() || self.core_claim == self.raw_input
    }
}
