//! Readiness polling against the application's health endpoint.

use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::domain::DeployError;

/// Polls a URL until it answers `200 OK` or the time budget runs out.
pub struct HealthPoller {
    client: Client,
    url: String,
    timeout: Duration,
    interval: Duration,
}

impl HealthPoller {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        interval: Duration,
        request_timeout: Duration,
    ) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .no_proxy()
            .user_agent(concat!("listpull-deploy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
            interval,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One request. Anything but exactly 200, including transport errors, is a failure.
    pub fn check(&self) -> bool {
        match self.client.get(&self.url).send() {
            Ok(response) => {
                debug!(url = %self.url, status = %response.status(), "Health probe");
                response.status() == StatusCode::OK
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "Health probe failed");
                false
            }
        }
    }

    /// Poll until healthy or timed out. `on_retry` runs after each failed
    /// attempt's delay. Timing out is not an error: the result is `false`.
    pub fn wait(&self, mut on_retry: impl FnMut()) -> bool {
        let start = Instant::now();
        let mut attempts = 0u32;

        while start.elapsed() < self.timeout {
            attempts += 1;
            if self.check() {
                info!(attempts, elapsed = ?start.elapsed(), "Application healthy");
                return true;
            }
            thread::sleep(self.interval);
            on_retry();
        }

        warn!(attempts, timeout = ?self.timeout, "Health check timed out");
        false
    }
}
