//! Debate value objects: roles, sources, and transcript messages.
//!
//! `DebateMessage` is the unit of debate-history truth. Once appended to the
//! session transcript it is never mutated or removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reliability tier of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    Low,
    Medium,
    High,
}

/// Identifies the agent role in the debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentRole {
    Pro,
    Contra,
    Judge,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentRole::Pro => "PRO",
            AgentRole::Contra => "CONTRA",
            AgentRole::Judge => "JUDGE",
        };
        write!(f, "{s}")
    }
}

/// Kind of debate message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Argument,
    Rebuttal,
    Defense,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MessageKind::Argument => "argument",
            MessageKind::Rebuttal => "rebuttal",
            MessageKind::Defense => "defense",
        };
        write!(f, "{s}")
    }
}

/// Communication style of a debating agent. A small closed set, selected at
/// session configuration time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Personality {
    Passive,
    #[default]
    Assertive,
    Aggressive,
}

impl std::str::FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PASSIVE" => Ok(Personality::Passive),
            "ASSERTIVE" => Ok(Personality::Assertive),
            "AGGRESSIVE" => Ok(Personality::Aggressive),
            other => Err(format!(
                "unknown personality '{other}' (expected PASSIVE, ASSERTIVE, or AGGRESSIVE)"
            )),
        }
    }
}

/// A single cited piece of evidence.
///
/// Built by agents from raw search hits; consumed read-only by the other
/// agents and the judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub url: String,

    pub title: String,

    pub snippet: String,

    /// Assessed reliability tier
    pub reliability: Reliability,

    /// When the source was collected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Which agent collected this source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentRole>,

    /// Relevance in [0, 1], when scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f32>,
}

/// One turn's output in the debate transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateMessage {
    /// Round this message belongs to (0 = opening)
    pub round: u32,

    /// Who spoke
    pub agent: AgentRole,

    /// What kind of move this was
    pub kind: MessageKind,

    /// The generated text
    pub content: String,

    /// Cited sources, in presentation order
    #[serde(default)]
    pub sources: Vec<Source>,

    /// Speaker's confidence in [0, 100]
    pub confidence: f32,
}

impl DebateMessage {
    /// Create a message, clamping confidence into [0, 100].
    pub fn new(
        round: u32,
        agent: AgentRole,
        kind: MessageKind,
        content: impl Into<String>,
        sources: Vec<Source>,
        confidence: f32,
    ) -> Self {
        Self {
            round,
            agent,
            kind,
            content: content.into(),
            sources,
            confidence: confidence.clamp(0.0, 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        let msg = DebateMessage::new(1, AgentRole::Pro, MessageKind::Argument, "x", vec![], 140.0);
        assert_eq!(msg.confidence, 100.0);

        let msg = DebateMessage::new(1, AgentRole::Pro, MessageKind::Argument, "x", vec![], -5.0);
        assert_eq!(msg.confidence, 0.0);
    }

    #[test]
    fn agent_role_serializes_uppercase() {
        let json = serde_json::to_string(&AgentRole::Contra).unwrap();
        assert_eq!(json, "\"CONTRA\"");
    }

    #[test]
    fn personality_parses_case_insensitively() {
        assert_eq!(
            "aggressive".parse::<Personality>().unwrap(),
            Personality::Aggressive
        );
        assert!("bold".parse::<Personality>().is_err());
    }

    #[test]
    fn reliability_orders_low_to_high() {
        assert!(Reliability::Low < Reliability::Medium);
        assert!(Reliability::Medium < Reliability::High);
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = DebateMessage::new(
            2,
            AgentRole::Contra,
            MessageKind::Rebuttal,
            "The evidence says otherwise",
            vec![Source {
                url: "https://factcheck.example.org/a".into(),
                title: "Checked".into(),
                snippet: "…".into(),
                reliability: Reliability::High,
                timestamp: None,
                agent: Some(AgentRole::Contra),
                relevance_score: None,
            }],
            70.0,
        );
        let json = serde_json::to_string(&msg).unwrap();
        let back: DebateMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.round, 2);
        assert_eq!(back.kind, MessageKind::Rebuttal);
        assert_eq!(back.sources.len(), 1);
    }
}
