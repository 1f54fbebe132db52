//! The CONTRA agent — the skeptic. Challenges the claim with fact-check
//! sources and, at deep research depth, a parallel query fan-out.

use std::sync::Arc;

use tracing::{error, info, warn};

use veritas_core::generator::{ChatMessage, Generator};
use veritas_core::{
    AgentRole, DebateMessage, MessageKind, ResearchDepth, SearchHit, SessionState,
};
use veritas_tools::{SearchBudget, SearchStrategy, ToolAccess};

use crate::personality;
use crate::sources::{curate_sources, format_sources};

const WITH_SOURCES_CONFIDENCE: f32 = 70.0;
const WITHOUT_SOURCES_CONFIDENCE: f32 = 30.0;

const DEGRADED_REBUTTAL: &str = "Unable to generate counterargument due to technical \
     difficulties. The system is experiencing issues communicating with the language model.";

/// The claim's challenger.
pub struct ContraAgent {
    generator: Arc<dyn Generator>,
    tools: Arc<ToolAccess>,
    budget: SearchBudget,
    personality: veritas_core::Personality,
}

impl ContraAgent {
    pub fn new(
        generator: Arc<dyn Generator>,
        tools: Arc<ToolAccess>,
        personality: veritas_core::Personality,
        max_searches: i32,
    ) -> Self {
        info!(personality = ?personality, "Initialized CONTRA agent");
        Self {
            generator,
            tools,
            budget: SearchBudget::new(max_searches),
            personality,
        }
    }

    pub fn display_name(&self) -> &'static str {
        personality::display_name(AgentRole::Contra, self.personality)
    }

    /// Searches issued by this agent so far.
    pub fn searches_used(&self) -> usize {
        self.budget.used()
    }

    /// Produce the opening challenge or a rebuttal of the latest PRO
    /// message, with research effort set by the depth signal.
    pub async fn think(&self, state: &SessionState) -> DebateMessage {
        let claim = &state.claim;
        let depth = state.research_depth();
        let is_initial_round = state.round_count() == 0;

        info!(
            agent = self.display_name(),
            round = state.round_count(),
            depth = ?depth,
            "CONTRA thinking"
        );

        let search_query = if is_initial_round {
            format!("fake news {}", claim.core_claim)
        } else {
            format!("contradiction {}", claim.core_claim)
        };

        let hits = if !is_initial_round && depth == ResearchDepth::Deep {
            // Deep rebuttal: two independent queries run concurrently and
            // their results are concatenated before source curation.
            let rebuttal_query = format!("debunk {}", claim.core_claim);
            info!(agent = self.display_name(), "Deep research: parallel searches for rebuttal");

            let (mut first, second) = tokio::join!(
                self.search(&search_query, SearchStrategy::FactCheckFirst),
                self.search(&rebuttal_query, SearchStrategy::WebDeepDive),
            );
            first.extend(second);
            first
        } else {
            self.search(&search_query, SearchStrategy::FactCheckFirst)
                .await
        };

        let sources = curate_sources(&hits, AgentRole::Contra, depth.source_cap());
        info!(
            agent = self.display_name(),
            sources = sources.len(),
            depth = ?depth,
            "CONTRA curated sources"
        );

        let (prompt, kind) = if is_initial_round {
            (
                format!(
                    "Analyze this claim: \"{}\"\n\
                     Original input: \"{}\"\n\n\
                     Available sources:\n{}\n\n\
                     Generate an initial skeptical opening statement for the debate.\n\
                     Set the stage by questioning the validity or context of the claim.\n\
                     Speak naturally and engage the audience.",
                    claim.core_claim,
                    claim.raw_input,
                    format_sources(&sources),
                ),
                MessageKind::Argument,
            )
        } else {
            let last_content = state
                .last_message()
                .map(|m| m.content.as_str())
                .unwrap_or_default();
            (
                format!(
                    "The PRO agent argued:\n\"{last_content}\"\n\n\
                     Claim: \"{}\"\n\n\
                     Available sources:\n{}\n\n\
                     Generate a rebuttal. Directly address the PRO agent's points.\n\
                     Point out logical fallacies, missing context, or contradictory evidence \
                     using a conversational but critical tone.",
                    claim.core_claim,
                    format_sources(&sources),
                ),
                MessageKind::Rebuttal,
            )
        };

        let system = personality::system_prompt(
            AgentRole::Contra,
            self.personality,
            &state.settings.language,
        );
        let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];

        let (content, confidence) = match self.generator.generate(&messages).await {
            Ok(content) => {
                let confidence = if sources.is_empty() {
                    WITHOUT_SOURCES_CONFIDENCE
                } else {
                    WITH_SOURCES_CONFIDENCE
                };
                (content, confidence)
            }
            Err(e) => {
                error!(agent = self.display_name(), error = %e, "LLM call failed in CONTRA agent");
                (DEGRADED_REBUTTAL.into(), 0.0)
            }
        };

        DebateMessage::new(
            state.round_count(),
            AgentRole::Contra,
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
            "CONTRA searching"
        );
        self.tools.dispatch(query, strategy, &self.budget).await
    }
}
