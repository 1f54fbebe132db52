//! Veritas CLI — the main entry point.
//!
//! Commands:
//! - `verify`       — Run a full debate over a claim (text or URL)
//! - `config-check` — Validate configuration and show credential status

use clap::{Parser, Subcommand};

use veritas_core::Personality;

mod commands;

#[derive(Parser)]
#[command(
    name = "veritas",
    about = "Veritas — adversarial debate verification for news claims",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a claim through a PRO/CONTRA debate and a judge verdict
    Verify {
        /// The claim text, or an article URL with --url
        input: String,

        /// Treat the input as an article URL to fetch and distill
        #[arg(long)]
        url: bool,

        /// Debate rounds after the opening (1-10)
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Per-agent search budget (-1 = unlimited, 0 = no searches)
        #[arg(short = 's', long)]
        max_searches: Option<i32>,

        /// Output language
        #[arg(short, long)]
        language: Option<String>,

        /// PRO agent personality (PASSIVE, ASSERTIVE, AGGRESSIVE)
        #[arg(long)]
        pro_personality: Option<Personality>,

        /// CONTRA agent personality (PASSIVE, ASSERTIVE, AGGRESSIVE)
        #[arg(long)]
        contra_personality: Option<Personality>,

        /// Run PRO and CONTRA opening research concurrently instead of the
        /// fast zero-research PRO opening
        #[arg(long)]
        parallel_opening: bool,

        /// Emit the full outcome as JSON instead of rendered text
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration and report credential availability
    ConfigCheck,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Verify {
            input,
            url,
            rounds,
            max_searches,
            language,
            pro_personality,
            contra_personality,
            parallel_opening,
            json,
        } => {
            commands::verify::run(commands::verify::VerifyArgs {
                input,
                url,
                rounds,
                max_searches,
                language,
                pro_personality,
                contra_personality,
                parallel_opening,
                json,
            })
            .await?
        }
        Commands::ConfigCheck => commands::config_check::run()?,
    }

    Ok(())
}
