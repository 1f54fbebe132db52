//! Verdict types — the terminal artifact of a debate session.

use serde::{Deserialize, Serialize};

use crate::debate::Source;

/// The five mutually exclusive verdict categories.
///
/// Serialized with the upstream wire names so existing consumers of the
/// verdict payload keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictCategory {
    /// The claim is substantially true
    #[serde(rename = "VERO")]
    True,

    /// The claim is demonstrably false
    #[serde(rename = "FALSO")]
    False,

    /// A kernel of truth, but misleading or exaggerated
    #[serde(rename = "PARZIALMENTE_VERO")]
    PartiallyTrue,

    /// Technically accurate but misleading without context
    #[serde(rename = "CONTESTO_MANCANTE")]
    MissingContext,

    /// Insufficient credible evidence either way
    #[serde(rename = "NON_VERIFICABILE")]
    Unverifiable,
}

impl std::fmt::Display for VerdictCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VerdictCategory::True => "true",
            VerdictCategory::False => "false",
            VerdictCategory::PartiallyTrue => "partially true",
            VerdictCategory::MissingContext => "missing context",
            VerdictCategory::Unverifiable => "cannot verify",
        };
        write!(f, "{s}")
    }
}

/// Structured analysis backing the verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerdictAnalysis {
    /// Assessment of the PRO side's argument strength
    #[serde(default)]
    pub pro_strength: String,

    /// Assessment of the CONTRA side's argument strength
    #[serde(default)]
    pub contra_strength: String,

    /// Facts both sides agreed on
    #[serde(default)]
    pub consensus_facts: Vec<String>,

    /// Points that remained disputed
    #[serde(default)]
    pub disputed_points: Vec<String>,
}

/// Locally computed metadata about the verification run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerdictMetadata {
    /// Wall-clock seconds from session start to verdict
    pub processing_time_seconds: f64,

    /// Debate rounds completed
    pub rounds_completed: u32,

    /// Distinct source URLs cited across the whole transcript
    pub total_sources_checked: usize,
}

/// The final structured verdict. Produced exactly once, by the judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub verdict: VerdictCategory,

    /// Confidence in [0, 100]
    pub confidence_score: f32,

    /// Natural-language justification
    pub summary: String,

    #[serde(default)]
    pub analysis: VerdictAnalysis,

    /// Curated list of the most critical sources from the debate
    #[serde(default)]
    pub sources_used: Vec<Source>,

    #[serde(default)]
    pub metadata: VerdictMetadata,
}

impl Verdict {
    /// The deterministic degraded verdict used when evaluation fails.
    /// Metadata is still computed from the session the same way as on the
    /// success path.
    pub fn unverifiable(summary: impl Into<String>, metadata: VerdictMetadata) -> Self {
        Self {
            verdict: VerdictCategory::Unverifiable,
            confidence_score: 0.0,
            summary: summary.into(),
            analysis: VerdictAnalysis::default(),
            sources_used: Vec::new(),
            metadata,
        }
    }
}
