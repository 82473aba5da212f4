//! CLI tests module
//!
//! Tests for argument parsing, JSON output formatting and config rendering.

use super::*;
use clap::Parser;
use rolecraft_utils::error::LlmError;
use rolecraft_utils::types::{ConfigSource, SourceKind};

use crate::{Config, Role, WorkflowError, WorkflowOutcome};

#[test]
fn test_cli_definition_is_consistent() {
    build_cli().debug_assert();
}

#[test]
fn test_parse_generate_command() {
    let cli = Cli::try_parse_from([
        "rolecraft",
        "generate",
        "--role",
        "Tester",
        "--issue",
        "DEMO1",
        "--document",
        "DOC1",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            role,
            issue,
            document,
            json,
        } => {
            assert_eq!(role, "Tester");
            assert_eq!(issue, "DEMO1");
            assert_eq!(document, "DOC1");
            assert!(json);
        }
        other => panic!("expected generate, got {other:?}"),
    }
}

#[test]
fn test_generate_requires_all_identifiers() {
    let result = Cli::try_parse_from(["rolecraft", "generate", "--role", "Tester"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "rolecraft",
        "serve",
        "--bind",
        "0.0.0.0:8080",
        "--verbose",
        "--model",
        "gpt-4o",
        "--config",
        "custom.toml",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("custom.toml"))
    );
    match cli.command {
        Commands::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:8080")),
        other => panic!("expected serve, got {other:?}"),
    }
}

#[test]
fn test_role_is_not_validated_by_the_parser() {
    // Roles are validated by the workflow, not by clap
    let cli = Cli::try_parse_from([
        "rolecraft",
        "generate",
        "--role",
        "tester",
        "--issue",
        "A",
        "--document",
        "B",
    ]);
    assert!(cli.is_ok());
}

#[test]
fn test_success_envelope() {
    let result = Ok(WorkflowOutcome {
        role: Role::Tester,
        issue_id: "DEMO1".to_string(),
        document_id: "DOC1".to_string(),
        output: "cases".to_string(),
    });

    let value = generate_envelope(&result);

    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["role"], "Tester");
    assert_eq!(value["data"]["jiraId"], "DEMO1");
    assert_eq!(value["data"]["confId"], "DOC1");
    assert_eq!(value["data"]["output"], "cases");
}

#[test]
fn test_failure_envelope_carries_kind() {
    let cases = [
        (WorkflowError::invalid_role(), "client_input"),
        (
            WorkflowError::not_found(SourceKind::Document, "DOC9"),
            "not_found",
        ),
        (WorkflowError::Generation(LlmError::NoContent), "generation"),
    ];

    for (err, kind) in cases {
        let message = err.to_string();
        let value = generate_envelope(&Err(err));
        assert_eq!(value["success"], false);
        assert_eq!(value["kind"], kind);
        assert_eq!(value["error"], message.as_str());
    }
}

#[test]
fn test_render_effective_config_lists_sources() {
    let mut config = Config::minimal_for_testing();
    config.llm.model = Some("gpt-4o".to_string());
    config
        .source_attribution
        .insert("model".to_string(), ConfigSource::Cli);

    let rendered = render_effective_config(&config);

    assert!(rendered.starts_with("Effective configuration:"));
    let model_line = rendered
        .lines()
        .find(|line| line.trim_start().starts_with("model "))
        .unwrap();
    assert!(model_line.contains("gpt-4o"));
    assert!(model_line.ends_with("(cli)"));
    assert!(rendered.contains("bind"));
}

mod generate_without_api_key {
    use super::super::commands::execute_generate_command;
    use super::super::run::report;
    use crate::{Config, ExitCode};
    use tempfile::TempDir;

    fn keyless_config(fixtures: &TempDir) -> Config {
        std::fs::write(
            fixtures.path().join("JIRA-DEMO1.json"),
            r#"{"summary":"Test Issue","description":"desc","acceptanceCriteria":["AC1"]}"#,
        )
        .unwrap();
        std::fs::write(
            fixtures.path().join("CONFLUENCE-DOC1.json"),
            r#"{"title":"Doc","body":"body text"}"#,
        )
        .unwrap();

        let mut config = Config::minimal_for_testing();
        config.sources.fixtures_dir = Some(fixtures.path().to_path_buf());
        config.llm.api_key_env = Some("ROLECRAFT_CLI_TEST_UNSET_KEY".to_string());
        config
    }

    async fn exit_code_for(role: &str, issue: &str, document: &str) -> ExitCode {
        let fixtures = TempDir::new().unwrap();
        let config = keyless_config(&fixtures);
        let err = execute_generate_command(role, issue, document, false, &config)
            .await
            .unwrap_err();
        report(&err)
    }

    #[tokio::test]
    async fn test_invalid_role_is_client_input() {
        assert_eq!(
            exit_code_for("Manager", "DEMO1", "DOC1").await,
            ExitCode::CLIENT_INPUT
        );
    }

    #[tokio::test]
    async fn test_missing_issue_is_not_found() {
        assert_eq!(
            exit_code_for("Tester", "MISSING", "DOC1").await,
            ExitCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_generation() {
        assert_eq!(
            exit_code_for("Tester", "DEMO1", "DOC1").await,
            ExitCode::GENERATION_FAILURE
        );
    }
}
