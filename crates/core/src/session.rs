//! Session state — the mutable record threaded through the state machine.
//!
//! Ownership rules: the debate state machine exclusively owns and mutates
//! `SessionState`. Agents receive a read view and hand back a [`TurnDelta`];
//! a single fold point ([`SessionState::apply`]) is the only writer. This
//! keeps concurrent research turns from corrupting shared history.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::claim::Claim;
use crate::debate::{DebateMessage, Personality};

/// Adaptive research effort level for the next research turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchDepth {
    /// No research at all (opening fast path)
    None,
    /// Single query, few retained sources
    #[default]
    Shallow,
    /// Parallel query fan-out, more retained sources
    Deep,
}

impl ResearchDepth {
    /// Maximum number of sources an agent retains at this depth.
    pub fn source_cap(self) -> usize {
        match self {
            ResearchDepth::None => 0,
            ResearchDepth::Shallow => 2,
            ResearchDepth::Deep => 5,
        }
    }
}

/// Immutable per-session settings, snapshotted from the validated config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Maximum completed PRO/CONTRA rounds
    pub max_rounds: u32,

    /// Per-agent search budget (−1 = unlimited, 0 = no searches)
    pub max_searches: i32,

    /// Target language for all generated output
    pub language: String,

    pub pro_personality: Personality,

    pub contra_personality: Personality,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            max_searches: -1,
            language: "English".into(),
            pro_personality: Personality::Assertive,
            contra_personality: Personality::Assertive,
        }
    }
}

/// The state delta an agent turn hands back to the state machine.
#[derive(Debug, Clone, Default)]
pub struct TurnDelta {
    /// Messages to append, in logical debate order
    pub new_messages: Vec<DebateMessage>,

    /// Round counter increment (0 or 1; only the PRO turn sets 1)
    pub round_delta: u32,

    /// New research-depth signal, if this turn recomputed it
    pub depth: Option<ResearchDepth>,
}

impl TurnDelta {
    /// A delta carrying a single message and nothing else.
    pub fn message(message: DebateMessage) -> Self {
        Self {
            new_messages: vec![message],
            ..Self::default()
        }
    }

    pub fn with_round_increment(mut self) -> Self {
        self.round_delta = 1;
        self
    }

    pub fn with_depth(mut self, depth: ResearchDepth) -> Self {
        self.depth = Some(depth);
        self
    }
}

/// The session record. The transcript is append-only and the round counter
/// is monotonically non-decreasing; both are enforced by construction since
/// `apply` is the only mutation point.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub claim: Claim,
    pub settings: SessionSettings,
    messages: Vec<DebateMessage>,
    round_count: u32,
    research_depth: ResearchDepth,
    started_at: Instant,
}

impl SessionState {
    pub fn new(claim: Claim, settings: SessionSettings) -> Self {
        Self {
            claim,
            settings,
            messages: Vec::new(),
            round_count: 0,
            research_depth: ResearchDepth::Shallow,
            started_at: Instant::now(),
        }
    }

    /// The full transcript, in logical debate order.
    pub fn messages(&self) -> &[DebateMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&DebateMessage> {
        self.messages.last()
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn research_depth(&self) -> ResearchDepth {
        self.research_depth
    }

    /// Wall-clock time since session start.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Number of distinct source URLs cited across the whole transcript.
    pub fn distinct_source_urls(&self) -> usize {
        let mut urls = HashSet::new();
        for message in &self.messages {
            for source in &message.sources {
                urls.insert(source.url.as_str());
            }
        }
        urls.len()
    }

    /// Fold a turn delta into the session. The only mutation point.
    pub fn apply(&mut self, delta: TurnDelta) {
        self.round_count += delta.round_delta;
        if let Some(depth) = delta.depth {
            self.research_depth = depth;
        }
        self.messages.extend(delta.new_messages);
    }
}
