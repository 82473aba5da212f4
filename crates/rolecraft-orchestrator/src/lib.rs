//! Role-based generation workflow
//!
//! [`WorkflowOrchestrator`] validates the role, fetches the issue and its
//! linked document concurrently, assembles the role-specific prompt and calls
//! the generation client. Every execution ends in a terminal
//! [`WorkflowState`] carrying either output or a [`WorkflowError`].

mod orchestrator;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;


pub use orchestrator::{StageTimeouts, WorkflowOrchestrator};
pub use rolecraft_utils::error::WorkflowError;
pub use rolecraft_utils::types::WorkflowStage;
pub use state::{WorkflowOutcome, WorkflowState};
