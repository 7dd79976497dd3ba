//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Settings that steer discovery, registration and HTTP calls.
///
/// The two `fixed_*` overrides let a known setup skip the network steps:
/// discovery returns `fixed_bridge_address` straight away and registration
/// hands back `fixed_username` without pressing the link button.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bridge base address (`http://host`) to use instead of SSDP discovery.
    pub fixed_bridge_address: Option<String>,
    /// API username to use instead of registering a new one.
    pub fixed_username: Option<String>,
    /// `devicetype` sent when registering, `application#device`.
    pub device_type: String,
    /// Where the list of known bridges lives.
    pub directory: PathBuf,
    /// How long discovery listens for SSDP replies.
    pub discovery_timeout: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Config {
    pub const DEFAULT_DEVICE_TYPE: &'static str = "hue-bridge-rs#device";
    pub const DEFAULT_DIRECTORY: &'static str = "bridge.dat";
    pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn with_fixed_bridge(mut self, address: impl Into<String>) -> Self {
        self.fixed_bridge_address = Some(address.into());
        self
    }

    pub fn with_fixed_username(mut self, username: impl Into<String>) -> Self {
        self.fixed_username = Some(username.into());
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fixed_bridge_address: None,
            fixed_username: None,
            device_type: Self::DEFAULT_DEVICE_TYPE.to_string(),
            directory: PathBuf::from(Self::DEFAULT_DIRECTORY),
            discovery_timeout: Self::DEFAULT_DISCOVERY_TIMEOUT,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
