//! Adaptive research-depth controller.
//!
//! Decides, before each research turn, how much evidence-gathering effort
//! is justified: low confidence in the latest message means the next
//! speaker needs more evidence; high confidence means a single query is
//! enough. The level is advisory — each agent caps its own retained
//! sources and search calls from it.

use tracing::info;

use veritas_core::{DebateMessage, ResearchDepth};

/// Confidence below this selects deep research for the following turn.
pub const CONFIDENCE_THRESHOLD: f32 = 50.0;

/// Pure function of the most recent message's confidence.
pub fn next_depth(last_message: Option<&DebateMessage>) -> ResearchDepth {
    let Some(message) = last_message else {
        return ResearchDepth::Shallow;
    };

    if message.confidence < CONFIDENCE_THRESHOLD {
        info!(
            confidence = message.confidence,
            "Low confidence, increasing research depth"
        );
        ResearchDepth::Deep
    } else {
        info!(
            confidence = message.confidence,
            "Normal confidence, using shallow research depth"
        );
        ResearchDepth::Shallow
    }
}
