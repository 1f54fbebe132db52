//! Debate state machine — sequences agent turns and decides termination.
//!
//! Node graph:
//!
//! ```text
//! extract → pro_opening → contra_research → adaptive_depth
//!                                               │
//!                              ┌────────────────┘
//!                              ▼
//!                          pro_turn → contra_turn
//!                              ▲           │
//!                              │     round < max? ──► adaptive_depth
//!                              └───────────┘
//!                                    round ≥ max ──► judge → end
//! ```
//!
//! Every turn hands back a [`TurnDelta`]; `SessionState::apply` is the only
//! fold point, so the transcript stays append-only and the round counter
//! has exactly one increment site (the PRO turn). Agents substitute
//! degraded-but-valid output on failure, so the machine never retries,
//! never re-enters a node, and always reaches the judge.

pub mod resources;

pub use resources::SharedResources;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use veritas_agent::{ContraAgent, JudgeAgent, ProAgent, extract_claim, next_depth};
use veritas_config::DebateConfig;
use veritas_core::{
    Claim, DebateMessage, Error, ResearchDepth, SessionSettings, SessionState, TurnDelta, Verdict,
};

/// Progress events emitted while a session runs.
#[derive(Debug, Clone)]
pub enum DebateEvent {
    ClaimExtracted(Claim),
    MessageAdded(DebateMessage),
    DepthAdjusted(ResearchDepth),
    VerdictReached(Verdict),
}

/// The terminal payload of a session: the verdict plus the full transcript.
#[derive(Debug, Clone, Serialize)]
pub struct DebateOutcome {
    pub claim: Claim,
    pub transcript: Vec<DebateMessage>,
    pub verdict: Verdict,
}

/// The debate orchestrator. One instance runs one session at a time; the
/// injected resources may be shared across sessions.
pub struct DebateMachine {
    resources: SharedResources,
    config: DebateConfig,
    events: Option<mpsc::Sender<DebateEvent>>,
}

impl DebateMachine {
    /// Create a machine. The session configuration is validated here —
    /// an out-of-bounds round count or budget never reaches the debate
    /// loop.
    pub fn new(resources: SharedResources, config: DebateConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            resources,
            config,
            events: None,
        })
    }

    /// Attach an event channel for progress streaming.
    pub fn with_events(mut self, events: mpsc::Sender<DebateEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Verify a raw text claim.
    pub async fn verify_text(&self, text: &str) -> DebateOutcome {
        self.run(Claim::from_raw(text)).await
    }

    /// Run the full debate for a claim. Infallible past construction: a
    /// degraded run still terminates with a structurally valid verdict.
    pub async fn run(&self, claim: Claim) -> DebateOutcome {
        let settings = SessionSettings {
            max_rounds: self.config.max_rounds,
            max_searches: self.config.max_searches,
            language: self.config.language.clone(),
            pro_personality: self.config.pro_personality,
            contra_personality: self.config.contra_personality,
        };
        let mut state = SessionState::new(claim, settings);

        // Per-session policy units over the shared handles; each agent owns
        // its search budget.
        let pro = ProAgent::new(
            self.resources.generator.clone(),
            self.resources.tools.clone(),
            self.config.pro_personality,
            self.config.max_searches,
        );
        let contra = ContraAgent::new(
            self.resources.generator.clone(),
            self.resources.tools.clone(),
            self.config.contra_personality,
            self.config.max_searches,
        );
        let judge = JudgeAgent::new(self.resources.generator.clone());

        // ── extract ──
        // Idempotent: skipped when the claim already carries a distilled
        // assertion.
        if state.claim.needs_extraction() {
            info!("Starting claim extraction");
            let extracted =
                extract_claim(self.resources.generator.as_ref(), &state.claim.raw_input).await;
            state.claim = extracted;
            self.emit(DebateEvent::ClaimExtracted(state.claim.clone())).await;
        } else {
            debug!("Claim already extracted, skipping");
        }

        // ── opening ──
        if self.config.lazy_opening {
            // pro_opening: zero-research fast path, then CONTRA researches.
            info!(agent = pro.display_name(), "PRO opening statement (no research)");
            let message = pro.opening_statement(&state).await;
            self.emit(DebateEvent::MessageAdded(message.clone())).await;
            state.apply(TurnDelta::message(message).with_depth(ResearchDepth::Shallow));

            info!(agent = contra.display_name(), "CONTRA research phase");
            let message = contra.think(&state).await;
            self.emit(DebateEvent::MessageAdded(message.clone())).await;
            state.apply(TurnDelta::message(message));
        } else {
            // Both opening research turns run concurrently; the machine
            // serializes the append so transcript order stays PRO-then-CONTRA.
            info!("Starting parallel research phase (PRO & CONTRA)");
            let (pro_message, contra_message) =
                tokio::join!(pro.think(&state), contra.think(&state));

            self.emit(DebateEvent::MessageAdded(pro_message.clone())).await;
            self.emit(DebateEvent::MessageAdded(contra_message.clone())).await;
            state.apply(TurnDelta {
                new_messages: vec![pro_message, contra_message],
                round_delta: 0,
                depth: Some(ResearchDepth::Shallow),
            });
            info!("Parallel research phase complete");
        }

        // ── debate rounds ──
        loop {
            // adaptive_depth: recompute the effort signal from the latest
            // message before the next research turns.
            let depth = next_depth(state.last_message());
            self.emit(DebateEvent::DepthAdjusted(depth)).await;
            state.apply(TurnDelta::default().with_depth(depth));

            // pro_turn: the only round increment site.
            state.apply(TurnDelta::default().with_round_increment());
            info!(round = state.round_count(), "Starting debate round - PRO turn");
            let message = pro.think(&state).await;
            self.emit(DebateEvent::MessageAdded(message.clone())).await;
            state.apply(TurnDelta::message(message));

            // contra_turn: closes the round without incrementing.
            info!(round = state.round_count(), "Continuing debate round - CONTRA turn");
            let message = contra.think(&state).await;
            self.emit(DebateEvent::MessageAdded(message.clone())).await;
            state.apply(TurnDelta::message(message));

            // Continuation policy.
            if state.round_count() >= self.config.max_rounds {
                info!(
                    max_rounds = self.config.max_rounds,
                    "Debate ending: maximum rounds reached"
                );
                break;
            }
            info!(round = state.round_count() + 1, "Debate continuing to next round");
        }

        // ── judge ──
        let verdict = judge.think(&state).await;
        self.emit(DebateEvent::VerdictReached(verdict.clone())).await;

        DebateOutcome {
            claim: state.claim.clone(),
            transcript: state.messages().to_vec(),
            verdict,
        }
    }

    async fn emit(&self, event: DebateEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver must not stall the debate.
            let _ = events.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use veritas_agent::test_helpers::*;
    use veritas_core::{AgentRole, MessageKind, VerdictCategory};
    use veritas_tools::ToolAccess;

    fn verdict_payload() -> serde_json::Value {
        serde_json::json!({
            "verdict": "PARZIALMENTE_VERO",
            "confidence_score": 65.0,
            "summary": "Partly supported.",
            "analysis": {
                "pro_strength": "moderate",
                "contra_strength": "moderate",
                "consensus_facts": ["the event happened"],
                "disputed_points": ["its scale"]
            },
            "sources_used": []
        })
    }

    /// A machine whose generator always succeeds and whose judge payload is
    /// valid.
    fn machine(config: DebateConfig, access: ToolAccess) -> DebateMachine {
        let generator =
            Arc::new(StaticGenerator::new("A concise debate statement.").with_json(verdict_payload()));
        let resources = SharedResources::new(generator, Arc::new(access));
        DebateMachine::new(resources, config).unwrap()
    }

    fn distilled_claim() -> Claim {
        let mut claim = Claim::from_raw("raw input text");
        claim.core_claim = "The distilled assertion".into();
        claim
    }

    #[test]
    fn invalid_config_rejected_at_entry() {
        let generator = Arc::new(StaticGenerator::new("x"));
        let resources = SharedResources::new(generator, Arc::new(empty_tool_access()));

        let result = DebateMachine::new(
            resources,
            DebateConfig {
                max_rounds: 0,
                ..DebateConfig::default()
            },
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn transcript_shape_matches_round_count() {
        for max_rounds in [1u32, 2, 3] {
            let config = DebateConfig {
                max_rounds,
                ..DebateConfig::default()
            };
            let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
            let outcome = machine(config, access).run(distilled_claim()).await;

            // opening PRO + opening CONTRA + max_rounds PRO/CONTRA pairs
            assert_eq!(
                outcome.transcript.len(),
                (2 * max_rounds + 2) as usize,
                "wrong transcript length for max_rounds={max_rounds}"
            );
            assert_eq!(outcome.verdict.metadata.rounds_completed, max_rounds);
        }
    }

    #[tokio::test]
    async fn transcript_order_alternates_pro_contra() {
        let config = DebateConfig {
            max_rounds: 2,
            ..DebateConfig::default()
        };
        let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
        let outcome = machine(config, access).run(distilled_claim()).await;

        let roles: Vec<AgentRole> = outcome.transcript.iter().map(|m| m.agent).collect();
        assert_eq!(
            roles,
            vec![
                AgentRole::Pro,
                AgentRole::Contra,
                AgentRole::Pro,
                AgentRole::Contra,
                AgentRole::Pro,
                AgentRole::Contra,
            ]
        );

        // Opening messages belong to round 0; pair k to round k.
        assert_eq!(outcome.transcript[0].round, 0);
        assert_eq!(outcome.transcript[1].round, 0);
        assert_eq!(outcome.transcript[2].round, 1);
        assert_eq!(outcome.transcript[5].round, 2);
    }

    #[tokio::test]
    async fn opening_is_sourceless_with_fixed_confidence() {
        let config = DebateConfig::default();
        let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
        let outcome = machine(config, access).run(distilled_claim()).await;

        let opening = &outcome.transcript[0];
        assert_eq!(opening.kind, MessageKind::Argument);
        assert!(opening.sources.is_empty());
        assert_eq!(opening.confidence, 60.0);
    }

    #[tokio::test]
    async fn zero_budget_session_produces_sourceless_transcript() {
        let config = DebateConfig {
            max_rounds: 1,
            max_searches: 0,
            ..DebateConfig::default()
        };
        let (access, brave) = tool_access_with_hits(vec!["https://a.example"]);
        let outcome = machine(config, access).run(distilled_claim()).await;

        assert_eq!(outcome.transcript.len(), 4);
        for message in &outcome.transcript {
            assert!(
                message.sources.is_empty(),
                "expected no sources with a zero search budget"
            );
        }
        assert_eq!(brave.call_count(), 0);
        assert_eq!(outcome.verdict.verdict, VerdictCategory::PartiallyTrue);
    }

    #[tokio::test]
    async fn budget_exhaustion_empties_later_rounds() {
        let config = DebateConfig {
            max_rounds: 3,
            max_searches: 1,
            ..DebateConfig::default()
        };
        let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
        let outcome = machine(config, access).run(distilled_claim()).await;

        // PRO's single budget slot goes to round 1; its round-3 defense has
        // no evidence left.
        let pro_round1 = &outcome.transcript[2];
        let pro_round3 = &outcome.transcript[6];
        assert_eq!(pro_round1.agent, AgentRole::Pro);
        assert!(!pro_round1.sources.is_empty());
        assert!(pro_round3.sources.is_empty());
    }

    #[tokio::test]
    async fn always_failing_generator_still_reaches_fallback_verdict() {
        let config = DebateConfig {
            max_rounds: 2,
            ..DebateConfig::default()
        };
        let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
        let resources =
            SharedResources::new(Arc::new(FailingGenerator), Arc::new(access));
        let outcome = DebateMachine::new(resources, config)
            .unwrap()
            .run(distilled_claim())
            .await;

        assert_eq!(outcome.transcript.len(), 6);
        for message in &outcome.transcript {
            assert_eq!(message.confidence, 0.0);
            assert!(!message.content.is_empty());
        }
        assert_eq!(outcome.verdict.verdict, VerdictCategory::Unverifiable);
        assert_eq!(outcome.verdict.confidence_score, 0.0);
        assert_eq!(outcome.verdict.metadata.rounds_completed, 2);
    }

    #[tokio::test]
    async fn parallel_opening_preserves_logical_order() {
        let config = DebateConfig {
            max_rounds: 1,
            lazy_opening: false,
            ..DebateConfig::default()
        };
        let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
        let outcome = machine(config, access).run(distilled_claim()).await;

        assert_eq!(outcome.transcript.len(), 4);
        assert_eq!(outcome.transcript[0].agent, AgentRole::Pro);
        assert_eq!(outcome.transcript[1].agent, AgentRole::Contra);
        // Both opening research turns carry sources (research ran)
        assert!(!outcome.transcript[0].sources.is_empty());
        assert_eq!(outcome.transcript[0].kind, MessageKind::Argument);
        assert_eq!(outcome.transcript[1].kind, MessageKind::Argument);
    }

    #[tokio::test]
    async fn extraction_runs_only_for_undistilled_claims() {
        let generator = Arc::new(StaticGenerator::new("statement").with_json(verdict_payload()));
        let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
        let resources = SharedResources::new(generator, Arc::new(access));
        let machine = DebateMachine::new(resources, DebateConfig::default()).unwrap();

        let outcome = machine.run(distilled_claim()).await;
        assert_eq!(outcome.claim.core_claim, "The distilled assertion");
    }

    #[tokio::test]
    async fn events_stream_matches_transcript() {
        let config = DebateConfig {
            max_rounds: 1,
            ..DebateConfig::default()
        };
        let (access, _brave) = tool_access_with_hits(vec!["https://a.example"]);
        let (tx, mut rx) = mpsc::channel(64);
        let generator =
            Arc::new(StaticGenerator::new("statement").with_json(verdict_payload()));
        let resources = SharedResources::new(generator, Arc::new(access));
        let machine = DebateMachine::new(resources, config)
            .unwrap()
            .with_events(tx);

        let outcome = machine.run(distilled_claim()).await;
        drop(machine);

        let mut message_events = 0;
        let mut verdict_events = 0;
        while let Some(event) = rx.recv().await {
            match event {
                DebateEvent::MessageAdded(_) => message_events += 1,
                DebateEvent::VerdictReached(_) => verdict_events += 1,
                _ => {}
            }
        }
        assert_eq!(message_events, outcome.transcript.len());
        assert_eq!(verdict_events, 1);
    }

    #[tokio::test]
    async fn repeated_pro_queries_hit_the_cache() {
        // PRO searches the same claim with the same strategy every round;
        // within the TTL window the underlying tool runs once.
        let config = DebateConfig {
            max_rounds: 3,
            ..DebateConfig::default()
        };
        let brave = Arc::new(CountingSearchTool::new("brave", vec!["https://a.example"]));
        let access = ToolAccess::new(100, Duration::from_secs(3600), 10).register(brave.clone());
        let outcome = machine(config, access).run(distilled_claim()).await;

        assert_eq!(outcome.transcript.len(), 8);
        // Distinct queries: PRO's claim query, CONTRA's "fake news …" and
        // "contradiction …" — each invoked at most once against the tool.
        assert!(brave.call_count() <= 3, "cache did not deduplicate repeat queries");
    }
}
