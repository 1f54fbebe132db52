//! The `verify` command — run one full debate session and render the
//! verdict.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use veritas_agent::personality::display_name;
use veritas_agent::claim_from_url;
use veritas_config::AppConfig;
use veritas_core::{AgentRole, Claim, DebateMessage, Personality, Verdict};
use veritas_workflow::{DebateEvent, DebateMachine, DebateOutcome, SharedResources};

pub struct VerifyArgs {
    pub input: String,
    pub url: bool,
    pub rounds: Option<u32>,
    pub max_searches: Option<i32>,
    pub language: Option<String>,
    pub pro_personality: Option<Personality>,
    pub contra_personality: Option<Personality>,
    pub parallel_opening: bool,
    pub json: bool,
}

pub async fn run(args: VerifyArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("failed to load configuration")?;

    if let Some(rounds) = args.rounds {
        config.debate.max_rounds = rounds;
    }
    if let Some(max_searches) = args.max_searches {
        config.debate.max_searches = max_searches;
    }
    if let Some(language) = args.language {
        config.debate.language = language;
    }
    if let Some(personality) = args.pro_personality {
        config.debate.pro_personality = personality;
    }
    if let Some(personality) = args.contra_personality {
        config.debate.contra_personality = personality;
    }
    if args.parallel_opening {
        config.debate.lazy_opening = false;
    }
    config.validate().context("invalid configuration")?;

    let generator =
        veritas_providers::from_config(&config.generator).context("no generator backend")?;
    let tools = Arc::new(veritas_tools::default_access(&config.tools));
    let resources = SharedResources::new(generator, tools.clone());

    let claim = if args.url {
        claim_from_url(&tools, resources.generator.as_ref(), &args.input)
            .await
            .context("failed to distill a claim from the URL")?
    } else {
        Claim::from_raw(&args.input)
    };

    let debate_config = config.debate.clone();

    let outcome = if args.json {
        // JSON mode: single terminal payload, no progress rendering.
        let machine = DebateMachine::new(resources, debate_config)?;
        machine.run(claim).await
    } else {
        run_with_progress(resources, debate_config, claim).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_outcome(&outcome);
    }

    Ok(())
}

/// Run the session while streaming each message to the terminal as it
/// lands.
async fn run_with_progress(
    resources: SharedResources,
    config: veritas_config::DebateConfig,
    claim: Claim,
) -> anyhow::Result<DebateOutcome> {
    let (tx, mut rx) = mpsc::channel(64);
    let pro_personality = config.pro_personality;
    let contra_personality = config.contra_personality;
    let machine = DebateMachine::new(resources, config)?.with_events(tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                DebateEvent::ClaimExtracted(claim) => {
                    println!("Distilled claim: {}\n", claim.core_claim);
                }
                DebateEvent::MessageAdded(message) => {
                    print_message(&message, pro_personality, contra_personality);
                }
                DebateEvent::DepthAdjusted(_) | DebateEvent::VerdictReached(_) => {}
            }
        }
    });

    let outcome = machine.run(claim).await;
    drop(machine);
    let _ = printer.await;

    Ok(outcome)
}

fn print_message(message: &DebateMessage, pro: Personality, contra: Personality) {
    let name = match message.agent {
        AgentRole::Pro => display_name(AgentRole::Pro, pro),
        AgentRole::Contra => display_name(AgentRole::Contra, contra),
        AgentRole::Judge => "The Judge",
    };
    println!(
        "[round {}] {} ({}) — {} — confidence {:.0}",
        message.round, message.agent, name, message.kind, message.confidence
    );
    println!("{}\n", message.content);
    for source in &message.sources {
        println!("  · {} — {} ({:?})", source.title, source.url, source.reliability);
    }
    if !message.sources.is_empty() {
        println!();
    }
}

fn render_outcome(outcome: &DebateOutcome) {
    let verdict: &Verdict = &outcome.verdict;

    println!("{}", "=".repeat(60));
    println!(
        "VERDICT: {} — confidence {:.0}/100",
        verdict.verdict.to_string().to_uppercase(),
        verdict.confidence_score
    );
    println!("{}", "=".repeat(60));
    println!("\n{}\n", verdict.summary);

    if !verdict.analysis.pro_strength.is_empty() {
        println!("PRO strength:    {}", verdict.analysis.pro_strength);
    }
    if !verdict.analysis.contra_strength.is_empty() {
        println!("CONTRA strength: {}", verdict.analysis.contra_strength);
    }
    if !verdict.analysis.consensus_facts.is_empty() {
        println!("\nAgreed facts:");
        for fact in &verdict.analysis.consensus_facts {
            println!("  - {fact}");
        }
    }
    if !verdict.analysis.disputed_points.is_empty() {
        println!("\nDisputed points:");
        for point in &verdict.analysis.disputed_points {
            println!("  - {point}");
        }
    }
    if !verdict.sources_used.is_empty() {
        println!("\nKey sources:");
        for source in &verdict.sources_used {
            println!("  · {} — {} ({:?})", source.title, source.url, source.reliability);
        }
    }

    println!(
        "\nCompleted {} rounds in {:.2}s, {} distinct sources checked.",
        verdict.metadata.rounds_completed,
        verdict.metadata.processing_time_seconds,
        verdict.metadata.total_sources_checked
    );
}
