//! Role-specific prompt assembly
//!
//! Turns a fetched issue and its linked document into the instruction text sent
//! to the generation service. Assembly is deterministic: the same role and data
//! always produce byte-identical prompts.

use rolecraft_utils::types::{DocumentData, IssueData, Role};

/// Build the prompt for `role`.
///
/// - [`Role::Tester`] asks for structured test cases and embeds the acceptance
///   criteria, one per line, in their original order.
/// - [`Role::BusinessAnalyst`] asks for user stories and open questions and
///   leaves the acceptance criteria out.
///
/// Both variants embed the document title and body.
///
/// # Example
///
/// ```rust
/// use rolecraft_prompt_template::assemble;
/// use rolecraft_utils::types::{DocumentData, IssueData, Role};
///
/// let issue = IssueData {
///     summary: "Login".into(),
///     description: "Users log in".into(),
///     acceptance_criteria: vec!["Rejects bad password".into()],
/// };
/// let doc = DocumentData { title: "Auth".into(), body: "Spec".into() };
///
/// let prompt = assemble(Role::Tester, &issue, &doc);
/// assert!(prompt.contains("Rejects bad password"));
/// ```
#[must_use]
pub fn assemble(role: Role, issue: &IssueData, document: &DocumentData) -> String {
    match role {
        Role::Tester => tester_prompt(issue, document),
        Role::BusinessAnalyst => business_analyst_prompt(issue, document),
    }
}

fn tester_prompt(issue: &IssueData, document: &DocumentData) -> String {
    format!(
        "You are a QA engineer. Given the following JIRA issue and Confluence page, \
         generate a list of test cases (with title, preconditions, steps, and expected results). \
         Include edge cases and negative tests.\n\
         \n\
         JIRA Summary: {summary}\n\
         JIRA Description: {description}\n\
         JIRA Acceptance Criteria: {criteria}\n\
         \n\
         Confluence Page Title: {title}\n\
         Confluence Content: {body}\n\
         \n\
         Generate a comprehensive set of test cases:",
        summary = issue.summary,
        description = issue.description,
        criteria = issue.acceptance_criteria.join("\n"),
        title = document.title,
        body = document.body,
    )
}

fn business_analyst_prompt(issue: &IssueData, document: &DocumentData) -> String {
    format!(
        "You are a Business Analyst. Given the following JIRA issue and Confluence page, \
         generate detailed user stories and acceptance criteria. \
         Include any additional requirements or questions that need clarification.\n\
         \n\
         JIRA Summary: {summary}\n\
         JIRA Description: {description}\n\
         \n\
         Confluence Page Title: {title}\n\
         Confluence Content: {body}\n\
         \n\
         Generate detailed user stories and acceptance criteria:",
        summary = issue.summary,
        description = issue.description,
        title = document.title,
        body = document.body,
    )
}
