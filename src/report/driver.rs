// src/report/driver.rs
use super::{RecordReport, Report, RowFailure};
use crate::health::HealthChecker;
use crate::inventory::{LoadBalancerRecord, RawRow};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

/// Parses inventory rows and checks every frontend and backend.
pub struct ReportDriver {
    checker: HealthChecker,
    concurrency: usize,
}

impl ReportDriver {
    pub fn new(checker: HealthChecker, concurrency: usize) -> Self {
        Self {
            checker,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run(&self, rows: Vec<RawRow>) -> Report {
        let (records, failures) = parse_records(rows);
        let records = self.check_records(records).await;

        Report {
            generated_at: Utc::now(),
            records,
            failures,
        }
    }

    /// Check the frontend, then each backend in declared order, for every
    /// record. Up to `concurrency` checks run at once but results come back
    /// in that same order.
    pub async fn check_records(&self, records: Vec<LoadBalancerRecord>) -> Vec<RecordReport> {
        let jobs: Vec<_> = records
            .iter()
            .flat_map(|record| {
                std::iter::once(&record.frontend)
                    .chain(record.backends.iter())
                    .map(move |endpoint| (endpoint, &record.health_check))
            })
            .collect();

        info!(
            "Checking {} endpoints across {} load balancers",
            jobs.len(),
            records.len()
        );

        let results: Vec<_> = stream::iter(jobs)
            .map(|(endpoint, health_check)| self.checker.check_endpoint(endpoint, health_check))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut results = results.into_iter();
        records
            .into_iter()
            .filter_map(|record| {
                let frontend = results.next()?;
                let backends = results.by_ref().take(record.backends.len()).collect();
                Some(RecordReport {
                    name: record.name,
                    health_check: record.health_check,
                    frontend,
                    backends,
                })
            })
            .collect()
    }
}

/// Turn raw rows into records. Bad rows are logged and collected instead
/// of stopping the run.
pub fn parse_records(rows: Vec<RawRow>) -> (Vec<LoadBalancerRecord>, Vec<RowFailure>) {
    let mut records = Vec::with_capacity(rows.len());
    let mut failures = Vec::new();

    for row in rows {
        if row.fields.is_empty() {
            continue;
        }

        match LoadBalancerRecord::parse(&row.fields) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(line = row.line, %error, "Skipping inventory row");
                failures.push(RowFailure {
                    line: row.line,
                    error,
                });
            }
        }
    }

    (records, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::health::{HttpProbe, TcpProbe};
    use crate::inventory::{Endpoint, HealthCheckSpec, RecordError};
    use crate::range::RangeError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::time::{sleep, Duration};

    /// Passes every address in `up`; later addresses answer faster so
    /// concurrent runs complete out of order.
    struct ScriptedProbe {
        up: HashSet<String>,
    }

    impl ScriptedProbe {
        fn new(up: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                up: up.iter().map(|a| a.to_string()).collect(),
            })
        }

        async fn answer(&self, endpoint: &Endpoint) -> bool {
            let last_octet: u64 = endpoint
                .address
                .rsplit('.')
                .next()
                .and_then(|o| o.parse().ok())
                .unwrap_or(0);
            sleep(Duration::from_millis(50u64.saturating_sub(last_octet * 5))).await;
            self.up.contains(&endpoint.address)
        }
    }

    #[async_trait]
    impl TcpProbe for ScriptedProbe {
        async fn connect(&self, endpoint: &Endpoint, _limit: Duration) -> bool {
            self.answer(endpoint).await
        }
    }

    #[async_trait]
    impl HttpProbe for ScriptedProbe {
        async fn get(&self, endpoint: &Endpoint, _check: &HealthCheckSpec, _limit: Duration) -> bool {
            self.answer(endpoint).await
        }
    }

    fn driver(probe: Arc<ScriptedProbe>, concurrency: usize) -> ReportDriver {
        let checker = HealthChecker::new(probe.clone(), probe, &ProbeConfig::default());
        ReportDriver::new(checker, concurrency)
    }

    fn raw(line: u64, fields: &[&str]) -> RawRow {
        RawRow {
            line,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn rows() -> Vec<RawRow> {
        vec![
            raw(2, &["web", "10.0.0.1", "80", "", "192.168.1.[1:4]", "8080", ""]),
            raw(3, &["broken", "10.0.0.2", "80"]),
            raw(4, &["api", "10.0.0.3", "443", "/health", "192.168.2.[7:5]", "9000", ""]),
            raw(5, &["db", "10.0.0.4", "5432", "/ping", "192.168.3.9", "5432", "u:p"]),
        ]
    }

    #[test]
    fn test_parse_records_isolates_failures() {
        let (records, failures) = parse_records(rows());

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["web", "db"]);

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].line, 3);
        assert!(matches!(failures[0].error, RecordError::FieldCount { found: 3, .. }));
        assert_eq!(failures[1].line, 4);
        assert!(matches!(failures[1].error, RecordError::Range(_)));
    }

    #[tokio::test]
    async fn test_run_reports_each_endpoint() {
        let probe = ScriptedProbe::new(&["10.0.0.1", "192.168.1.1", "192.168.1.3", "10.0.0.4"]);
        let report = driver(probe, 1).run(rows()).await;

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures.len(), 2);

        let web = &report.records[0];
        assert!(web.frontend.is_passing());
        assert_eq!(web.frontend.verdict.label, "L4:P");
        let labels: Vec<_> = web.backends.iter().map(|b| b.verdict.label.as_str()).collect();
        assert_eq!(labels, vec!["L4:P", "L4:F", "L4:P", "L4:F"]);

        let db = &report.records[1];
        assert_eq!(db.frontend.verdict.label, "L4:P,L7:P");
        assert_eq!(db.backends[0].verdict.label, "L4:F,L7:F");

        let summary = report.summary();
        assert_eq!(summary.endpoints, 7);
        assert_eq!(summary.passing, 4);
        assert_eq!(summary.skipped_rows, 2);
        assert!(!report.all_passing());
    }

    #[tokio::test]
    async fn test_concurrent_run_keeps_declared_order() {
        let up = ["10.0.0.1", "192.168.1.2", "192.168.1.4"];
        let sequential = driver(ScriptedProbe::new(&up), 1).run(rows()).await;
        let concurrent = driver(ScriptedProbe::new(&up), 8).run(rows()).await;

        let order = |report: &Report| -> Vec<(String, String)> {
            report
                .endpoints()
                .map(|e| (e.endpoint.address.clone(), e.verdict.label.clone()))
                .collect()
        };
        assert_eq!(order(&sequential), order(&concurrent));
        assert_eq!(concurrent.records[0].backends[3].endpoint.address, "192.168.1.4");
    }

    #[tokio::test]
    async fn test_record_without_backends_still_checks_frontend() {
        let probe = ScriptedProbe::new(&["10.0.0.9"]);
        let report = driver(probe, 1)
            .run(vec![raw(2, &["solo", "10.0.0.9", "80", "", "", "8080", ""])])
            .await;

        assert_eq!(report.records.len(), 1);
        assert!(report.records[0].backends.is_empty());
        assert!(report.records[0].frontend.is_passing());
        assert!(report.all_passing());
    }

    #[tokio::test]
    async fn test_oversized_range_is_skipped_and_run_continues() {
        let probe = ScriptedProbe::new(&["10.0.0.5", "10.0.0.6"]);
        let report = driver(probe, 1)
            .run(vec![
                raw(2, &["huge", "10.0.0.4", "80", "", "10.0.0.[0:4294967295]", "8080", ""]),
                raw(3, &["next", "10.0.0.5", "80", "", "10.0.0.6", "8080", ""]),
            ])
            .await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 2);
        assert!(matches!(
            report.failures[0].error,
            RecordError::Range(RangeError::OctetOutOfRange { bound: 4294967295, .. })
        ));

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "next");
        assert_eq!(report.summary().passing, 2);
    }

    #[tokio::test]
    async fn test_skipped_row_fails_an_otherwise_healthy_run() {
        let probe = ScriptedProbe::new(&["10.0.0.9"]);
        let report = driver(probe, 1)
            .run(vec![
                raw(2, &["solo", "10.0.0.9", "80", "", "", "8080", ""]),
                raw(3, &["broken", "10.0.0.2", "80"]),
            ])
            .await;

        let summary = report.summary();
        assert_eq!(summary.passing, summary.endpoints);
        assert_eq!(summary.skipped_rows, 1);
        assert!(!report.all_passing());
    }
}
