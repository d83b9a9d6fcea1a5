// src/inventory/endpoint.rs
use serde::Serialize;
use std::fmt;

/// An address/port pair to probe.
///
/// The port stays as the text read from the inventory and is only turned
/// into a number when a connection is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub address: String,
    pub port: String,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: port.into(),
        }
    }

    /// The port as a number, or `None` if the inventory text isn't one.
    pub fn port_number(&self) -> Option<u16> {
        self.port.trim().parse().ok()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Basic-auth credentials for the L7 probe.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    /// Parse `user:password`, splitting on the first `:`. Anything after it,
    /// further colons included, is the password. Returns `None` for blank
    /// input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (user, password) = raw.split_once(':').unwrap_or((raw, ""));
        Some(Self {
            user: user.to_string(),
            password: password.to_string(),
        })
    }
}

// Never leak the password through logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:****", self.user)
    }
}

/// What the L7 probe should request. An empty `path` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthCheckSpec {
    pub path: String,
    pub credentials: Option<Credentials>,
}

impl HealthCheckSpec {
    pub fn new(path: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            path: path.into(),
            credentials,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.path.is_empty()
    }
}
