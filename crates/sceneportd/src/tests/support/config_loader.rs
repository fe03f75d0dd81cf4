//! Configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig as _, OrthoError};
use sceneport_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader that binds to loopback on the given port.
pub struct TestConfigLoader {
    port: u16,
}

impl TestConfigLoader {
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            host: "127.0.0.1".to_owned(),
            port: self.port,
            log_filter: "warn".to_owned(),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing a non-numeric port on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("sceneportd"),
            OsString::from("--port"),
            OsString::from("not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}
