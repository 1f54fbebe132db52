//! # Veritas Core
//!
//! Domain types, traits, and error definitions for the Veritas
//! debate-verification engine. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here: the generative
//! capability ([`Generator`]), the search tools ([`SearchTool`]), and the
//! page fetcher ([`PageFetcher`]). Implementations live in their respective
//! crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod claim;
pub mod debate;
pub mod error;
pub mod generator;
pub mod search;
pub mod session;
pub mod verdict;

// Re-export key types at crate root for ergonomics
pub use claim::{Claim, ClaimCategory, Entities};
pub use debate::{AgentRole, DebateMessage, MessageKind, Personality, Reliability, Source};
pub use error::{Error, GeneratorError, Result, SearchError};
pub use generator::{ChatMessage, ChatRole, Generator, extract_json};
pub use search::{PageContent, PageFetcher, SearchHit, SearchTool};
pub use session::{ResearchDepth, SessionSettings, SessionState, TurnDelta};
pub use verdict::{Verdict, VerdictAnalysis, VerdictCategory, VerdictMetadata};
