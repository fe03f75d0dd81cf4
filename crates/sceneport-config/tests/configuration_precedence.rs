//! Layering tests for the server configuration.

use std::ffi::OsString;
use std::fs;

use ortho_config::OrthoConfig as _;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use sceneport_config::{Config, LogFormat};

struct Harness {
    temp_dir: TempDir,
    args: Vec<OsString>,
}

impl Harness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        Self {
            temp_dir,
            args: vec![OsString::from("sceneportd")],
        }
    }

    fn write_config(&mut self, contents: &str) {
        let path = self.temp_dir.path().join("sceneport.toml");
        fs::write(&path, contents).expect("write configuration");
        self.args.push(OsString::from("--config-path"));
        self.args.push(path.into_os_string());
    }

    fn push_arg(&mut self, arg: &str) {
        self.args.push(OsString::from(arg));
    }

    fn load(&self) -> Config {
        Config::load_from_iter(self.args.clone()).expect("configuration should load")
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[rstest]
fn configuration_file_overrides_defaults(mut harness: Harness) {
    harness.write_config("host = \"127.0.0.1\"\nport = 2101\nlog_format = \"json\"\n");

    let config = harness.load();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 2101);
    assert_eq!(config.log_format(), LogFormat::Json);
    assert_eq!(config.log_filter(), "info");
}

#[rstest]
fn cli_flags_override_configuration_file(mut harness: Harness) {
    harness.write_config("port = 2101\n");
    harness.push_arg("--port");
    harness.push_arg("2202");

    let config = harness.load();

    assert_eq!(config.port, 2202);
    assert_eq!(config.host, "0.0.0.0");
}
