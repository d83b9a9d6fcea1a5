// src/health/mod.rs
mod checker;
mod probe;
mod status;

pub use checker::{HealthCheckResult, HealthChecker};
pub use probe::{probe_url, HttpProbe, NetworkProbe, ProbeError, TcpProbe};
pub use status::{HealthStatus, StatusList, StatusListError, Verdict};
