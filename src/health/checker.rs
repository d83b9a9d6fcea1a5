// src/health/checker.rs
use super::probe::{HttpProbe, NetworkProbe, TcpProbe};
use super::status::{StatusList, Verdict};
use crate::config::ProbeConfig;
use crate::inventory::{Endpoint, HealthCheckSpec};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::Duration;
use tracing::debug;

/// Runs the L4 probe, then the L7 probe when a health-check path is set.
#[derive(Clone)]
pub struct HealthChecker {
    tcp: Arc<dyn TcpProbe>,
    http: Arc<dyn HttpProbe>,
    timeout: Duration,
    short_circuit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub endpoint: Endpoint,
    pub statuses: StatusList,
    pub verdict: Verdict,
    pub response_time_ms: u64,
}

impl HealthCheckResult {
    pub fn is_passing(&self) -> bool {
        self.verdict.passing
    }
}

impl HealthChecker {
    pub fn new(tcp: Arc<dyn TcpProbe>, http: Arc<dyn HttpProbe>, config: &ProbeConfig) -> Self {
        Self {
            tcp,
            http,
            timeout: config.timeout(),
            short_circuit: config.short_circuit,
        }
    }

    /// Checker backed by real network probes.
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        let probe = Arc::new(NetworkProbe::new(config.timeout(), &config.user_agent)?);
        Ok(Self::new(probe.clone(), probe, config))
    }

    /// Probe one endpoint. Probe failures end up in the status list; this
    /// never fails.
    pub async fn check(&self, endpoint: &Endpoint, health_check: &HealthCheckSpec) -> StatusList {
        let l4_passed = self.tcp.connect(endpoint, self.timeout).await;
        let statuses = StatusList::new(l4_passed);

        if !health_check.is_enabled() {
            return statuses;
        }

        let l7_passed = if !l4_passed && self.short_circuit {
            debug!(%endpoint, "L4 failed, skipping L7 probe");
            false
        } else {
            self.http.get(endpoint, health_check, self.timeout).await
        };

        statuses.with_l7(l7_passed)
    }

    /// Probe and classify one endpoint.
    pub async fn check_endpoint(
        &self,
        endpoint: &Endpoint,
        health_check: &HealthCheckSpec,
    ) -> HealthCheckResult {
        let start = Instant::now();
        let statuses = self.check(endpoint, health_check).await;
        let response_time_ms = start.elapsed().as_millis() as u64;
        let verdict = statuses.classify();

        debug!(
            %endpoint,
            status = %verdict.label,
            passing = verdict.passing,
            response_time_ms,
            "Endpoint checked"
        );

        HealthCheckResult {
            endpoint: endpoint.clone(),
            statuses,
            verdict,
            response_time_ms,
        }
    }
}
