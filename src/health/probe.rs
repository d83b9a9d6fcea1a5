// src/health/probe.rs
use crate::inventory::{Endpoint, HealthCheckSpec};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tracing::debug;
use url::Url;

/// L4 reachability probe.
#[async_trait]
pub trait TcpProbe: Send + Sync {
    /// `true` if a TCP connection was established within `limit`.
    async fn connect(&self, endpoint: &Endpoint, limit: Duration) -> bool;
}

/// L7 probe: an HTTP GET of the health-check path.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// `true` for a 2xx/3xx answer within `limit`. Every other outcome,
    /// network errors included, is `false`.
    async fn get(&self, endpoint: &Endpoint, check: &HealthCheckSpec, limit: Duration) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("port `{0}` is not a valid TCP port")]
    InvalidPort(String),

    #[error("invalid health check URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Target URL for the L7 probe: `http://{address}:{port}{path}`.
pub fn probe_url(endpoint: &Endpoint, path: &str) -> Result<Url, ProbeError> {
    let port = endpoint
        .port_number()
        .ok_or_else(|| ProbeError::InvalidPort(endpoint.port.clone()))?;
    let url = Url::parse(&format!("http://{}:{}{}", endpoint.address, port, path))?;
    Ok(url)
}

/// Probes backed by real sockets and a shared HTTP client.
#[derive(Debug, Clone)]
pub struct NetworkProbe {
    client: Client,
}

impl NetworkProbe {
    pub fn new(limit: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(limit)
            .connect_timeout(limit)
            .user_agent(user_agent)
            // Endpoints are probed directly, never through a proxy.
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TcpProbe for NetworkProbe {
    async fn connect(&self, endpoint: &Endpoint, limit: Duration) -> bool {
        let Some(port) = endpoint.port_number() else {
            debug!(%endpoint, "TCP probe skipped: {}", ProbeError::InvalidPort(endpoint.port.clone()));
            return false;
        };

        match timeout(limit, TcpStream::connect((endpoint.address.as_str(), port))).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                debug!(%endpoint, error = %e, "TCP probe failed");
                false
            }
            Err(_) => {
                debug!(%endpoint, "TCP probe timed out after {:?}", limit);
                false
            }
        }
    }
}

#[async_trait]
impl HttpProbe for NetworkProbe {
    async fn get(&self, endpoint: &Endpoint, check: &HealthCheckSpec, limit: Duration) -> bool {
        let url = match probe_url(endpoint, &check.path) {
            Ok(url) => url,
            Err(e) => {
                debug!(%endpoint, "HTTP probe skipped: {}", e);
                return false;
            }
        };

        let mut request = self.client.get(url.as_str());
        if let Some(credentials) = &check.credentials {
            request = request.basic_auth(&credentials.user, Some(&credentials.password));
        }

        match timeout(limit, request.send()).await {
            Ok(Ok(response)) => {
                let status = response.status();
                let ok = !(status.is_client_error() || status.is_server_error());
                if !ok {
                    debug!(%url, %status, "HTTP probe got a failing status");
                }
                ok
            }
            Ok(Err(e)) => {
                debug!(%url, error = %e, "HTTP probe failed");
                false
            }
            Err(_) => {
                debug!(%url, "HTTP probe timed out after {:?}", limit);
                false
            }
        }
    }
}
