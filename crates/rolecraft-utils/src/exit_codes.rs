//! Exit code constants and error mapping for the `rolecraft` CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Workflow completed |
//! | 1 | `INTERNAL` | Unknown or internal failure |
//! | 2 | `CLIENT_INPUT` | Invalid role, arguments or configuration |
//! | 3 | `NOT_FOUND` | Issue or document could not be resolved |
//! | 70 | `GENERATION_FAILURE` | Generation service failed |

use crate::error::{ConfigError, WorkflowError};

/// Process exit code.
///
/// # Example
///
/// ```rust
/// use rolecraft_utils::error::WorkflowError;
/// use rolecraft_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// let err = WorkflowError::invalid_role();
/// assert_eq!(ExitCode::from(&err), ExitCode::CLIENT_INPUT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - workflow completed
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - unexpected failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Client input error - invalid role, arguments or configuration
    pub const CLIENT_INPUT: ExitCode = ExitCode(2);

    /// Not found - an issue or document identifier did not resolve
    pub const NOT_FOUND: ExitCode = ExitCode(3);

    /// Generation failure - the generation service failed or returned nothing
    pub const GENERATION_FAILURE: ExitCode = ExitCode(70);

    /// Get the numeric value of the exit code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an exit code from a raw integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<&WorkflowError> for ExitCode {
    fn from(err: &WorkflowError) -> Self {
        match err {
            WorkflowError::ClientInput(_) => ExitCode::CLIENT_INPUT,
            WorkflowError::NotFound { .. } => ExitCode::NOT_FOUND,
            WorkflowError::Generation(_) => ExitCode::GENERATION_FAILURE,
            WorkflowError::Unknown(_) => ExitCode::INTERNAL,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(_: &ConfigError) -> Self {
        ExitCode::CLIENT_INPUT
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::types::SourceKind;

    #[test]
    fn test_workflow_errors_map_to_distinct_codes() {
        let cases = [
            (WorkflowError::invalid_role(), 2),
            (WorkflowError::not_found(SourceKind::Issue, "X"), 3),
            (WorkflowError::Generation(LlmError::NoContent), 70),
            (WorkflowError::Unknown("boom".to_string()), 1),
        ];
        for (err, expected) in cases {
            assert_eq!(ExitCode::from(&err).as_i32(), expected, "{err}");
        }
    }

    #[test]
    fn test_config_errors_are_client_input() {
        let err = ConfigError::InvalidValue {
            key: "bind".to_string(),
            value: "nope".to_string(),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::CLIENT_INPUT);
    }

    #[test]
    fn test_round_trip_through_i32() {
        assert_eq!(ExitCode::from_i32(70), ExitCode::GENERATION_FAILURE);
        assert_eq!(i32::from(ExitCode::NOT_FOUND), 3);
    }
}
