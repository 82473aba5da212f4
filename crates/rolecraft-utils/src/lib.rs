//! Foundation types, errors and logging shared by the rolecraft crates.

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

pub use error::{
    ConfigError, ErrorCategory, LlmError, SourceError, UserFriendlyError, WorkflowError,
};
pub use exit_codes::ExitCode;
pub use types::{ConfigSource, DocumentData, IssueData, Role, SourceKind, WorkflowStage};
