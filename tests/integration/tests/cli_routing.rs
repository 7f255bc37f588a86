//! CLI routing integration tests.
//!
//! These verify that top-level command routing and argument validation work
//! as expected, and that commands reach a server built from the flags.

use clap::Parser;
use tss_cli::commands::secret::SecretCommand;
use tss_cli::commands::template::TemplateCommand;
use tss_cli::{run, Cli, Commands};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_cli_help_lists_commands() {
    let err = Cli::try_parse_from(["tss", "--help"]).err().unwrap();
    let help = err.to_string();
    assert!(help.contains("secret"));
    assert!(help.contains("template"));
    assert!(help.contains("version"));
}

#[test]
fn test_cli_unknown_command() {
    assert!(Cli::try_parse_from(["tss", "nonexistent-command"]).is_err());
}

#[test]
fn test_cli_secret_subcommands() {
    for args in [
        vec!["tss", "secret", "get", "1"],
        vec!["tss", "secret", "search", "db"],
        vec!["tss", "secret", "delete", "1"],
        vec!["tss", "secret", "update", "1", "--field", "notes=hi"],
    ] {
        let cli = Cli::try_parse_from(&args).unwrap();
        assert!(matches!(cli.command, Commands::Secret(_)), "{:?}", args);
    }
}

#[test]
fn test_cli_secret_search_field() {
    let cli = Cli::try_parse_from(["tss", "secret", "search", "db", "--field", "name"]).unwrap();
    match cli.command {
        Commands::Secret(args) => match args.command {
            SecretCommand::Search { text, field } => {
                assert_eq!(text, "db");
                assert_eq!(field.as_deref(), Some("name"));
            }
            _ => panic!("Expected Search command"),
        },
        _ => panic!("Expected Secret command"),
    }
}

#[test]
fn test_cli_create_requires_template() {
    let result = Cli::try_parse_from(["tss", "secret", "create", "--name", "x", "--folder", "1"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_template_get() {
    let cli = Cli::try_parse_from(["tss", "template", "get", "6007"]).unwrap();
    match cli.command {
        Commands::Template(args) => {
            assert!(matches!(args.command, TemplateCommand::Get { id: 6007 }));
        }
        _ => panic!("Expected Template command"),
    }
}

#[tokio::test]
async fn test_cli_delete_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/secrets/42"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json5");
    std::fs::write(&config, r#"{ credentials: { token: "tok" } }"#).unwrap();

    let uri = server.uri();
    let cli = Cli::try_parse_from([
        "tss",
        "--config",
        config.to_str().unwrap(),
        "--server-url",
        uri.as_str(),
        "secret",
        "delete",
        "42",
    ])
    .unwrap();

    run(cli).await.unwrap();
}
