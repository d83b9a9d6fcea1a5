// src/report/mod.rs
mod driver;
mod render;

pub use driver::{parse_records, ReportDriver};
pub use render::{renderer_for, JsonRenderer, Renderer, TableRenderer};

use crate::health::HealthCheckResult;
use crate::inventory::{HealthCheckSpec, RecordError};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Results of one audit run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub records: Vec<RecordReport>,
    pub failures: Vec<RowFailure>,
}

/// Frontend and backend results of a single load balancer, each classified
/// on its own.
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    pub name: String,
    pub health_check: HealthCheckSpec,
    pub frontend: HealthCheckResult,
    pub backends: Vec<HealthCheckResult>,
}

/// An inventory row that couldn't be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub line: u64,
    #[serde(serialize_with = "serialize_display")]
    pub error: RecordError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub endpoints: usize,
    pub passing: usize,
    pub skipped_rows: usize,
}

impl Report {
    pub fn endpoints(&self) -> impl Iterator<Item = &HealthCheckResult> {
        self.records
            .iter()
            .flat_map(|r| std::iter::once(&r.frontend).chain(r.backends.iter()))
    }

    pub fn summary(&self) -> Summary {
        Summary {
            endpoints: self.endpoints().count(),
            passing: self.endpoints().filter(|e| e.is_passing()).count(),
            skipped_rows: self.failures.len(),
        }
    }

    /// Every endpoint passed and no row was skipped.
    pub fn all_passing(&self) -> bool {
        self.failures.is_empty() && self.endpoints().all(HealthCheckResult::is_passing)
    }
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
