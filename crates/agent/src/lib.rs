//! Agent policy units for the Veritas debate.
//!
//! Three roles, one turn operation each:
//!
//! - **PRO** defends the claim; its `opening_statement` is the zero-research
//!   fast path used once per session.
//! - **CONTRA** challenges it, with a parallel query fan-out at deep
//!   research depth.
//! - **JUDGE** evaluates the transcript and emits the terminal verdict.
//!
//! All three consume the tool access layer and the generative capability
//! through trait handles; on any generative failure they substitute a
//! degraded-but-valid output so the state machine can always progress.

pub mod contra;
pub mod depth;
pub mod extractor;
pub mod judge;
pub mod personality;
pub mod pro;
pub mod sources;
pub mod test_helpers;

pub use contra::ContraAgent;
pub use depth::{CONFIDENCE_THRESHOLD, next_depth};
pub use extractor::{claim_from_url, extract_claim, validate_url};
pub use judge::JudgeAgent;
pub use pro::ProAgent;
pub use sources::curate_sources;
