//! The PRO agent — defends the claim using institutional and authoritative
//! sources.

use std::sync::Arc;

use tracing::{error, info, warn};

use veritas_core::generator::{ChatMessage, Generator};
use veritas_core::{
    AgentRole, DebateMessage, MessageKind, ResearchDepth, SearchHit, SessionState,
};
use veritas_tools::{SearchBudget, SearchStrategy, ToolAccess};

use crate::personality;
use crate::sources::{curate_sources, format_history, format_sources};

/// Confidence of an unresearched opening statement.
const OPENING_CONFIDENCE: f32 = 60.0;

/// Confidence of a successfully generated, research-backed argument.
const ARGUMENT_CONFIDENCE: f32 = 85.0;

const DEGRADED_OPENING: &str =
    "Unable to generate opening statement due to technical difficulties.";

const DEGRADED_ARGUMENT: &str = "Unable to generate argument due to technical difficulties. \
     The system is experiencing issues communicating with the language model.";

/// The claim's defender.
pub struct ProAgent {
    generator: Arc<dyn Generator>,
    tools: Arc<ToolAccess>,
    budget: SearchBudget,
    personality: veritas_core::Personality,
}

impl ProAgent {
    pub fn new(
        generator: Arc<dyn Generator>,
        tools: Arc<ToolAccess>,
        personality: veritas_core::Personality,
        max_searches: i32,
    ) -> Self {
        info!(personality = ?personality, "Initialized PRO agent");
        Self {
            generator,
            tools,
            budget: SearchBudget::new(max_searches),
            personality,
        }
    }

    pub fn display_name(&self) -> &'static str {
        personality::display_name(AgentRole::Pro, self.personality)
    }

    /// Searches issued by this agent so far.
    pub fn searches_used(&self) -> usize {
        self.budget.used()
    }

    /// The zero-research fast path, used once per session to minimize
    /// time-to-first-output: empty sources, fixed lower confidence.
    pub async fn opening_statement(&self, state: &SessionState) -> DebateMessage {
        let claim = &state.claim;
        info!(agent = self.display_name(), "PRO generating opening statement (no research)");

        let prompt = format!(
            "Claim: {}\nCategory: {}\n\n\
             You are opening a debate in support of this claim.\n\
             Make a compelling opening statement based on the claim itself and common knowledge.\n\n\
             Your opening should:\n\
             - State your position clearly\n\
             - Introduce the key points you'll defend\n\
             - Set a strong, confident tone\n\
             - DO NOT cite specific sources yet - this is your opening position\n\n\
             Speak naturally, as if you are in a live debate.",
            claim.core_claim, claim.category
        );

        let (content, confidence) = match self.generate(&prompt, state, DEGRADED_OPENING).await {
            Ok(content) => (content, OPENING_CONFIDENCE),
            Err(content) => (content, 0.0),
        };

        DebateMessage::new(
            state.round_count(),
            AgentRole::Pro,
            MessageKind::Argument,
            content,
            vec![],
            confidence,
        )
    }

    /// Produce an argument or defense informed by the current depth signal.
    pub async fn think(&self, state: &SessionState) -> DebateMessage {
        let claim = &state.claim;
        let depth = state.research_depth();

        info!(
            agent = self.display_name(),
            round = state.round_count(),
            depth = ?depth,
            "PRO thinking about claim"
        );

        if depth == ResearchDepth::None {
            return self.opening_statement(state).await;
        }

        let hits = self
            .search(&claim.core_claim, SearchStrategy::Institutional)
            .await;
        let sources = curate_sources(&hits, AgentRole::Pro, depth.source_cap());

        let prompt = format!(
            "Claim: {}\nCategory: {}\n\n\
             Search Results:\n{}\n\n\
             Debate History:\n{}\n\n\
             Based on the search results, construct a persuasive argument supporting the claim.\n\
             If this is a rebuttal, directly address the specific points raised by the CONTRA \
             agent in the history.\n\
             Speak naturally, as if you are in a live debate. Don't simply list facts; weave \
             them into a narrative.",
            claim.core_claim,
            claim.category,
            format_sources(&sources),
            format_history(state.messages()),
        );

        let (content, confidence) = match self.generate(&prompt, state, DEGRADED_ARGUMENT).await {
            Ok(content) => (content, ARGUMENT_CONFIDENCE),
            Err(content) => (content, 0.0),
        };

        let kind = if state.messages().is_empty() {
            MessageKind::Argument
        } else {
            MessageKind::Defense
        };

        DebateMessage::new(
            state.round_count(),
            AgentRole::Pro,
            kind,
            content,
            sources,
            confidence,
        )
    }

    /// Issue one tiered search against this agent's budget.
    async fn search(&self, query: &str, strategy: SearchStrategy) -> Vec<SearchHit> {
        if !self.budget.try_acquire() {
            warn!(agent = self.display_name(), query, "Search budget spent, skipping search");
            return Vec::new();
        }
        info!(
            agent = self.display_name(),
            search = self.budget.used(),
            query,
            strategy = ?strategy,
            "PRO searching"
        );
        self.tools.dispatch(query, strategy, &self.budget).await
    }

    /// Generate text; on failure return the fixed degraded content as Err.
    async fn generate(
        &self,
        prompt: &str,
        state: &SessionState,
        degraded: &str,
    ) -> Result<String, String> {
        let system = personality::system_prompt(
            AgentRole::Pro,
            self.personality,
            &state.settings.language,
        );
        let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];

        match self.generator.generate(&messages).await {
            Ok(content) => Ok(content),
            Err(e) => {
                error!(agent = self.display_name(), error = %e, "LLM call failed in PRO agent");
                Err(degraded.into())
            }
        }
    }
}
