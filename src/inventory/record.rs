// src/inventory/record.rs
use super::endpoint::{Credentials, Endpoint, HealthCheckSpec};
use crate::range::{self, RangeError};
use serde::Serialize;

/// Number of fields in an inventory row:
/// `name | frontend_ip | frontend_port | health_check_url | backend_ip_ranges | backend_port | health_check_auth`
pub const FIELD_COUNT: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid backend range: {0}")]
    Range(#[from] RangeError),
}

/// One load balancer from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBalancerRecord {
    pub name: String,
    pub frontend: Endpoint,
    pub backends: Vec<Endpoint>,
    pub health_check: HealthCheckSpec,
}

impl LoadBalancerRecord {
    /// Build a record from one inventory row. Every field is trimmed; the
    /// backend expression is expanded and each address gets the backend port.
    pub fn parse<S: AsRef<str>>(fields: &[S]) -> Result<Self, RecordError> {
        let [name, frontend_ip, frontend_port, health_check_url, backend_ranges, backend_port, auth] =
            fields
        else {
            return Err(RecordError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        };

        let health_check = HealthCheckSpec::new(
            health_check_url.as_ref().trim(),
            Credentials::parse(auth.as_ref()),
        );
        let frontend = Endpoint::new(frontend_ip.as_ref().trim(), frontend_port.as_ref().trim());

        let backend_port = backend_port.as_ref().trim();
        let backends = range::expand(backend_ranges.as_ref().trim())?
            .into_iter()
            .map(|address| Endpoint::new(address, backend_port))
            .collect();

        Ok(Self {
            name: name.as_ref().trim().to_string(),
            frontend,
            backends,
            health_check,
        })
    }
}
