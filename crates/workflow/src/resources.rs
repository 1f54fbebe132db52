//! Shared long-lived handles, injected once at construction.
//!
//! The generator client and the tool access layer are stateless and
//! thread-safe; building them once per process and passing them into every
//! machine avoids re-initialization cost without hidden global state.

use std::sync::Arc;

use veritas_core::generator::Generator;
use veritas_tools::ToolAccess;

/// The dependency container handed to [`crate::DebateMachine`].
#[derive(Clone)]
pub struct SharedResources {
    pub generator: Arc<dyn Generator>,
    pub tools: Arc<ToolAccess>,
}

impl SharedResources {
    pub fn new(generator: Arc<dyn Generator>, tools: Arc<ToolAccess>) -> Self {
        Self { generator, tools }
    }
}
