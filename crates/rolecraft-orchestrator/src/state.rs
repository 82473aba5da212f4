use rolecraft_utils::error::WorkflowError;
use rolecraft_utils::types::{DocumentData, IssueData, Role, WorkflowStage};

/// Record of one workflow execution.
///
/// Created with the request's role and identifiers; each stage fills in what
/// it produced. Once `stage` is terminal exactly one of `output` / `error` is
/// set. Mutation is confined to this crate so the invariant holds for callers.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    role: String,
    issue_id: String,
    document_id: String,
    stage: WorkflowStage,
    failed_stage: Option<WorkflowStage>,
    issue_data: Option<IssueData>,
    document_data: Option<DocumentData>,
    output: Option<String>,
    error: Option<WorkflowError>,
}

/// Successful result of a workflow, as handed to transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOutcome {
    pub role: Role,
    pub issue_id: String,
    pub document_id: String,
    pub output: String,
}

impl WorkflowState {
    pub(crate) fn new(role: &str, issue_id: &str, document_id: &str) -> Self {
        Self {
            role: role.to_string(),
            issue_id: issue_id.to_string(),
            document_id: document_id.to_string(),
            stage: WorkflowStage::Start,
            failed_stage: None,
            issue_data: None,
            document_data: None,
            output: None,
            error: None,
        }
    }

    /// Role exactly as the caller supplied it.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn issue_id(&self) -> &str {
        &self.issue_id
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    #[must_use]
    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// Stage that was running when the workflow failed.
    #[must_use]
    pub fn failed_stage(&self) -> Option<WorkflowStage> {
        self.failed_stage
    }

    #[must_use]
    pub fn issue_data(&self) -> Option<&IssueData> {
        self.issue_data.as_ref()
    }

    #[must_use]
    pub fn document_data(&self) -> Option<&DocumentData> {
        self.document_data.as_ref()
    }

    #[must_use]
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// Convert a terminal state into the transport-facing result.
    ///
    /// # Errors
    ///
    /// Returns the recorded [`WorkflowError`]. A state that is somehow not
    /// terminal yields [`WorkflowError::Unknown`].
    pub fn into_result(self) -> Result<WorkflowOutcome, WorkflowError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let (Some(output), WorkflowStage::Done) = (self.output, self.stage) else {
            return Err(WorkflowError::Unknown(format!(
                "workflow stopped in non-terminal stage '{}'",
                self.stage
            )));
        };
        let role = Role::parse(&self.role)?;
        Ok(WorkflowOutcome {
            role,
            issue_id: self.issue_id,
            document_id: self.document_id,
            output,
        })
    }

    pub(crate) fn advance(&mut self, next: WorkflowStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal transition {} -> {}",
            self.stage,
            next
        );
        self.stage = next;
    }

    pub(crate) fn set_issue_data(&mut self, data: IssueData) {
        self.issue_data = Some(data);
    }

    pub(crate) fn set_document_data(&mut self, data: DocumentData) {
        self.document_data = Some(data);
    }

    pub(crate) fn complete(mut self, output: String) -> Self {
        self.advance(WorkflowStage::Done);
        self.output = Some(output);
        self
    }

    pub(crate) fn fail(mut self, error: WorkflowError) -> Self {
        self.failed_stage = Some(self.stage);
        self.advance(WorkflowStage::Failed);
        self.error = Some(error);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolecraft_utils::error::LlmError;

    #[test]
    fn test_new_state_is_empty() {
        let state = WorkflowState::new("Tester", "DEMO1", "DOC1");
        assert_eq!(state.stage(), WorkflowStage::Start);
        assert_eq!(state.role(), "Tester");
        assert!(state.output().is_none());
        assert!(state.error().is_none());
        assert!(state.issue_data().is_none());
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_complete_sets_output_only() {
        let mut state = WorkflowState::new("Tester", "DEMO1", "DOC1");
        state.advance(WorkflowStage::Fetching);
        state.advance(WorkflowStage::Routing);
        state.advance(WorkflowStage::Generating);
        let state = state.complete("text".to_string());

        assert_eq!(state.stage(), WorkflowStage::Done);
        assert_eq!(state.output(), Some("text"));
        assert!(state.error().is_none());

        let outcome = state.into_result().unwrap();
        assert_eq!(outcome.role, Role::Tester);
        assert_eq!(outcome.output, "text");
    }

    #[test]
    fn test_fail_records_failed_stage() {
        let mut state = WorkflowState::new("Tester", "DEMO1", "DOC1");
        state.advance(WorkflowStage::Fetching);
        state.advance(WorkflowStage::Routing);
        state.advance(WorkflowStage::Generating);
        let state = state.fail(WorkflowError::Generation(LlmError::NoContent));

        assert_eq!(state.stage(), WorkflowStage::Failed);
        assert_eq!(state.failed_stage(), Some(WorkflowStage::Generating));
        assert!(state.output().is_none());
        assert!(matches!(
            state.into_result(),
            Err(WorkflowError::Generation(LlmError::NoContent))
        ));
    }

    #[test]
    fn test_non_terminal_state_converts_to_unknown() {
        let state = WorkflowState::new("Tester", "DEMO1", "DOC1");
        assert!(matches!(state.into_result(), Err(WorkflowError::Unknown(_))));
    }
}
