use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WorkflowError;

/// Audience a generated artifact is written for.
///
/// `Role` is a closed set. The wire spellings (`"Tester"`, `"BusinessAnalyst"`)
/// are case-sensitive; anything else is rejected by [`Role::parse`] before a
/// workflow touches any collaborator.
///
/// # Example
///
/// ```rust
/// use rolecraft_utils::types::Role;
///
/// let role = Role::parse("Tester").unwrap();
/// assert_eq!(role.as_str(), "Tester");
/// assert!(Role::parse("Manager").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// QA engineer: receives structured test cases.
    Tester,
    /// Business analyst: receives user stories and clarification questions.
    BusinessAnalyst,
}

impl Role {
    /// All accepted roles, in display order.
    pub const ALL: [Role; 2] = [Role::Tester, Role::BusinessAnalyst];

    /// Canonical wire spelling of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tester => "Tester",
            Self::BusinessAnalyst => "BusinessAnalyst",
        }
    }

    /// Parse a raw role value received from a caller.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ClientInput`] naming both permitted values when
    /// `raw` is not an exact match.
    pub fn parse(raw: &str) -> Result<Self, WorkflowError> {
        match raw {
            "Tester" => Ok(Self::Tester),
            "BusinessAnalyst" => Ok(Self::BusinessAnalyst),
            _ => Err(WorkflowError::invalid_role()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Issue content fetched from the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueData {
    pub summary: String,
    pub description: String,
    /// Ordered acceptance criteria; order is preserved in prompts.
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
}

/// Linked reference page fetched from the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    pub title: String,
    pub body: String,
}

/// Which kind of record a provider serves. Used to label not-found failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Issue,
    Document,
}

impl SourceKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stages of one workflow execution.
///
/// ```text
/// Start → Fetching → Routing → Generating → Done
///   └────────┴──────────┴───────────┴──────→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Start,
    Fetching,
    Routing,
    Generating,
    Done,
    Failed,
}

impl WorkflowStage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Fetching => "fetching",
            Self::Routing => "routing",
            Self::Generating => "generating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Whether the stage ends the workflow.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Every non-terminal stage may fail; otherwise stages advance strictly in order.
    #[must_use]
    pub const fn can_transition_to(&self, next: WorkflowStage) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::Fetching)
                | (Self::Fetching, Self::Routing)
                | (Self::Routing, Self::Generating)
                | (Self::Generating, Self::Done)
                | (
                    Self::Start | Self::Fetching | Self::Routing | Self::Generating,
                    Self::Failed
                )
        )
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of a configuration value.
///
/// Precedence: CLI arguments > environment > config file > programmatic > defaults.
///
/// Serializes to lowercase strings: `"cli"`, `"env"`, `"config"`, `"programmatic"`, `"default"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value read from a process environment variable.
    Env,
    /// Value loaded from configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

impl ConfigSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::Config => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}
