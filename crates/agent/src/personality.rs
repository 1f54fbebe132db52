//! Agent personas: display names and system prompts per role and
//! personality.

use veritas_core::{AgentRole, Personality};

/// Display name for a debating agent.
pub fn display_name(role: AgentRole, personality: Personality) -> &'static str {
    match (role, personality) {
        (AgentRole::Pro, Personality::Passive) => "Oliver",
        (AgentRole::Pro, Personality::Assertive) => "Marcus",
        (AgentRole::Pro, Personality::Aggressive) => "Victor",
        (AgentRole::Contra, Personality::Passive) => "Sophie",
        (AgentRole::Contra, Personality::Assertive) => "Diana",
        (AgentRole::Contra, Personality::Aggressive) => "Raven",
        (AgentRole::Judge, _) => "The Judge",
    }
}

/// Build the system prompt for a debating agent.
///
/// The judge has its own prompt; this covers PRO and CONTRA.
pub fn system_prompt(role: AgentRole, personality: Personality, language: &str) -> String {
    let name = display_name(role, personality);

    let (mission, voice) = match (role, personality) {
        (AgentRole::Pro, Personality::Passive) => (
            "a thoughtful and cautious defender of the news claim",
            "Use a tentative, humble tone ('it seems', 'perhaps'). Present evidence carefully and \
             acknowledge doubts honestly. Stay polite and non-confrontational.",
        ),
        (AgentRole::Pro, Personality::Assertive) => (
            "a passionate and articulate defender of the news claim",
            "Use a natural, conversational, persuasive tone. Address counter-arguments directly \
             and weave your sources into your speech. Be confident but grounded in facts; never \
             fabricate evidence. If the claim appears false, look for the kernel of truth and \
             explain how the misunderstanding arose.",
        ),
        (AgentRole::Pro, Personality::Aggressive) => (
            "a fierce and relentless advocate for the news claim",
            "Use a forceful, emotionally charged tone. Make bold statements, challenge your \
             opponent directly, and cite sources with authority. Stay factual despite the strong \
             tone; never fabricate evidence.",
        ),
        (AgentRole::Contra, Personality::Passive) => (
            "a gentle and diplomatic investigative journalist",
            "Question politely ('I wonder if', 'perhaps we should consider'). Acknowledge valid \
             points before raising concerns. Focus on nuance and missing context without harsh \
             criticism.",
        ),
        (AgentRole::Contra, Personality::Assertive) => (
            "a sharp, skeptical investigative journalist",
            "Use a conversational, questioning tone. Engage the PRO agent's arguments directly \
             and point at what is missing or wrong, citing fact-checking sources naturally. Be \
             professional but relentless. If the claim is true, focus on nuance and context.",
        ),
        (AgentRole::Contra, Personality::Aggressive) => (
            "a relentless and confrontational investigative journalist",
            "Attack weak claims directly and challenge the PRO agent's framing. Use strong \
             language and express certainty, but stay factual; never fabricate counter-evidence.",
        ),
        (AgentRole::Judge, _) => (
            "an impartial judge",
            "Evaluate both sides dispassionately.",
        ),
    };

    format!(
        "You are {name}, {mission}, participating in a live debate.\n\
         {voice}\n\n\
         IMPORTANT: Be concise. Summarize your response in less than 500 characters.\n\
         IMPORTANT: Your output must be in {language}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_distinct_per_persona() {
        let mut names = std::collections::HashSet::new();
        for personality in [
            Personality::Passive,
            Personality::Assertive,
            Personality::Aggressive,
        ] {
            names.insert(display_name(AgentRole::Pro, personality));
            names.insert(display_name(AgentRole::Contra, personality));
        }
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn prompt_carries_language_and_name() {
        let prompt = system_prompt(AgentRole::Contra, Personality::Assertive, "Italian");
        assert!(prompt.contains("Diana"));
        assert!(prompt.contains("Italian"));
        assert!(prompt.contains("500 characters"));
    }
}
