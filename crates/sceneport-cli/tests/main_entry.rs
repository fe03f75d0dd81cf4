//! Integration tests for the `sceneport` binary against a live server.

use std::sync::Arc;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use rstest::{fixture, rstest};

use sceneport_config::ListenEndpoint;
use sceneport_scene::{Document, catalog};
use sceneportd::{CommandServer, OperationRegistry, StructuredHealthReporter};

struct LiveServer {
    server: CommandServer<Document>,
    port: String,
}

#[fixture]
fn live() -> LiveServer {
    let server = CommandServer::new(
        ListenEndpoint::new("127.0.0.1", 0),
        OperationRegistry::from_catalog(catalog()),
        Document::default(),
        Arc::new(StructuredHealthReporter::new()),
    )
    .expect("build server");
    server.start().expect("start server");
    let port = server
        .local_addr()
        .expect("bound address")
        .port()
        .to_string();
    LiveServer { server, port }
}

#[rstest]
fn creates_and_reads_back_an_object(live: LiveServer) {
    cargo_bin_cmd!("sceneport")
        .args([
            "--port",
            &live.port,
            "create_object",
            r#"{"type":"SPHERE","name":"ball","params":{"radius":5}}"#,
        ])
        .assert()
        .success()
        .stdout(contains(r#""status": "success""#))
        .stdout(contains(r#""name": "ball""#));

    cargo_bin_cmd!("sceneport")
        .args(["--port", &live.port, "get_document_info"])
        .assert()
        .success()
        .stdout(contains(r#""object_count": 1"#));

    live.server.stop();
}

#[rstest]
fn error_envelopes_exit_with_status_one(live: LiveServer) {
    cargo_bin_cmd!("sceneport")
        .args(["--port", &live.port, "summon_dragon"])
        .assert()
        .code(1)
        .stdout(contains("Unknown command type: summon_dragon"));
}

#[test]
fn bad_parameters_exit_with_status_two() {
    cargo_bin_cmd!("sceneport")
        .args(["get_object_info", "not json"])
        .assert()
        .code(2)
        .stderr(contains("failed to parse command parameters"));
}

#[test]
fn missing_command_type_is_a_usage_error() {
    cargo_bin_cmd!("sceneport")
        .assert()
        .code(2)
        .stderr(contains("COMMAND_TYPE"));
}
