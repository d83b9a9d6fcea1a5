// src/inventory/mod.rs
mod endpoint;
mod loader;
mod record;

pub use endpoint::{Credentials, Endpoint, HealthCheckSpec};
pub use loader::{load_rows, parse_rows, RawRow};
pub use record::{LoadBalancerRecord, RecordError, FIELD_COUNT};
