//! The JUDGE agent — evaluates the full transcript and delivers the
//! terminal verdict. Performs no searches.

use std::sync::Arc;

use tracing::{error, info};

use veritas_core::generator::{ChatMessage, Generator};
use veritas_core::{SessionState, Verdict, VerdictMetadata};

const FALLBACK_SUMMARY: &str =
    "An error occurred during the evaluation process. Unable to reach a verdict.";

/// The impartial adjudicator.
pub struct JudgeAgent {
    generator: Arc<dyn Generator>,
}

impl JudgeAgent {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        info!("Initialized JUDGE agent");
        Self { generator }
    }

    /// Evaluate the debate and produce the verdict. On any generation or
    /// parsing failure, returns the deterministic fallback verdict with the
    /// same locally computed metadata as the success path.
    pub async fn think(&self, state: &SessionState) -> Verdict {
        info!("JUDGE agent is evaluating the debate");

        let transcript = format_transcript(state);
        let context = format!(
            "{transcript}\n\nIMPORTANT: Your output must be in {}.",
            state.settings.language
        );

        let messages = [
            ChatMessage::system(system_prompt()),
            ChatMessage::user(context),
        ];

        let metadata = compute_metadata(state);

        match self.generator.generate_json(&messages, &verdict_schema()).await {
            Ok(value) => match serde_json::from_value::<Verdict>(value) {
                Ok(mut verdict) => {
                    verdict.confidence_score = verdict.confidence_score.clamp(0.0, 100.0);
                    // Metadata is always computed locally, never trusted
                    // from the generator.
                    verdict.metadata = metadata;
                    info!(
                        verdict = %verdict.verdict,
                        confidence = verdict.confidence_score,
                        sources_used = verdict.sources_used.len(),
                        "Verdict reached"
                    );
                    verdict
                }
                Err(e) => {
                    error!(error = %e, "Verdict payload did not match schema");
                    Verdict::unverifiable(FALLBACK_SUMMARY, metadata)
                }
            },
            Err(e) => {
                error!(error = %e, "Error during verdict generation");
                Verdict::unverifiable(FALLBACK_SUMMARY, metadata)
            }
        }
    }
}

fn system_prompt() -> &'static str {
    "You are an impartial judge evaluating a debate on the veracity of a news claim.\n\
     Analyze the full transcript: the arguments, the cited sources and their reliability, \
     and the logical coherence of each side. Official sources (government, major news \
     agencies, fact-checkers) weigh more than social media or blogs.\n\n\
     Choose exactly one verdict category:\n\
     - VERO: substantially true, supported by strong independent evidence.\n\
     - FALSO: demonstrably false, credibly disproven.\n\
     - PARZIALMENTE_VERO: a kernel of truth, but misleading or exaggerated.\n\
     - CONTESTO_MANCANTE: technically accurate but misleading without context.\n\
     - NON_VERIFICABILE: insufficient credible evidence either way.\n\n\
     Base confidence_score on the quality and convergence of the evidence. Be specific in \
     the analysis fields. Curate sources_used down to the most critical sources from the \
     debate."
}

/// Format the claim and every message (round, agent, kind, content, sources
/// with reliability) into evaluation context.
fn format_transcript(state: &SessionState) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Initial Claim: {}\n", state.claim.core_claim));

    for message in state.messages() {
        lines.push(format!(
            "Round {} - {} ({}):",
            message.round,
            message.agent.to_string().to_lowercase(),
            message.kind
        ));
        lines.push(message.content.clone());
        if !message.sources.is_empty() {
            lines.push("Sources:".into());
            for source in &message.sources {
                lines.push(format!(
                    "- {}: {} (Reliability: {:?})",
                    source.title,
                    source.url,
                    source.reliability
                ));
            }
        }
        lines.push("-".repeat(20));
    }

    lines.join("\n")
}

/// Metadata is computed here, from session state, on both the success and
/// fallback paths.
fn compute_metadata(state: &SessionState) -> VerdictMetadata {
    let elapsed = state.elapsed().as_secs_f64();
    VerdictMetadata {
        processing_time_seconds: (elapsed * 100.0).round() / 100.0,
        rounds_completed: state.round_count(),
        total_sources_checked: state.distinct_source_urls(),
    }
}

/// JSON schema constraining the judge's structured output to the Verdict
/// shape.
fn verdict_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "verdict": {
                "type": "string",
                "enum": ["VERO", "FALSO", "PARZIALMENTE_VERO", "CONTESTO_MANCANTE", "NON_VERIFICABILE"]
            },
            "confidence_score": { "type": "number", "minimum": 0, "maximum": 100 },
            "summary": { "type": "string" },
            "analysis": {
                "type": "object",
                "properties": {
                    "pro_strength": { "type": "string" },
                    "contra_strength": { "type": "string" },
                    "consensus_facts": { "type": "array", "items": { "type": "string" } },
                    "disputed_points": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["pro_strength", "contra_strength", "consensus_facts", "disputed_points"]
            },
            "sources_used": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "url": { "type": "string" },
                        "title": { "type": "string" },
                        "snippet": { "type": "string" },
                        "reliability": { "type": "string", "enum": ["high", "medium", "low"] }
                    },
                    "required": ["url", "title", "snippet", "reliability"]
                }
            }
        },
        "required": ["verdict", "confidence_score", "summary", "analysis", "sources_used"]
    })
}
