// dashboard/metrics.rs - Remote KPI/alert polling
//
// The dashboard shows KPI cards and alert counters served by an external
// API as flat `{metric: number}` JSON objects. MetricsClient fetches them,
// MetricsPoller refreshes them on a fixed interval and publishes the latest
// snapshot through a tokio watch channel.
//
// A failed fetch never stops the poller: that source reads as empty, the
// error is logged and carried in `last_error`, and the next tick retries.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::dashboard::error::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Latest poll snapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub kpis: BTreeMap<String, f64>,
    pub alerts: BTreeMap<String, f64>,
    pub last_error: Option<String>,
    /// None until the first poll completes
    pub fetched_at: Option<DateTime<Utc>>,
}

/// HTTP client for the KPI and alert endpoints
#[derive(Clone, Debug)]
pub struct MetricsClient {
    http: reqwest::Client,
    kpi_url: Option<String>,
    alerts_url: Option<String>,
}

impl MetricsClient {
    pub fn new(kpi_url: Option<String>, alerts_url: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(MetricsClient {
            http,
            kpi_url,
            alerts_url,
        })
    }

    /// True when at least one endpoint is set
    pub fn is_configured(&self) -> bool {
        self.kpi_url.is_some() || self.alerts_url.is_some()
    }

    /// GET `url` and keep the numeric top-level fields
    pub async fn fetch_numbers(&self, url: &str) -> Result<BTreeMap<String, f64>> {
        let body: serde_json::Value = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(numeric_fields(&body))
    }

    /// Fetch both sources once
    pub async fn poll_once(&self) -> DashboardMetrics {
        let mut errors = Vec::new();

        let kpis = self.fetch_source("kpis", self.kpi_url.as_deref(), &mut errors).await;
        let alerts = self
            .fetch_source("alerts", self.alerts_url.as_deref(), &mut errors)
            .await;

        DashboardMetrics {
            kpis,
            alerts,
            last_error: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
            fetched_at: Some(Utc::now()),
        }
    }

    async fn fetch_source(
        &self,
        source: &str,
        url: Option<&str>,
        errors: &mut Vec<String>,
    ) -> BTreeMap<String, f64> {
        let Some(url) = url else {
            return BTreeMap::new();
        };

        match self.fetch_numbers(url).await {
            Ok(values) => {
                tracing::debug!("Fetched {} {} from {}", values.len(), source, url);
                values
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {} from {}: {}", source, url, e);
                errors.push(format!("{}: {}", source, e));
                BTreeMap::new()
            }
        }
    }
}

/// Numeric top-level fields of a JSON object; anything else is skipped
pub fn numeric_fields(value: &serde_json::Value) -> BTreeMap<String, f64> {
    value
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}

/// Background polling task; dropping it stops polling
#[derive(Debug)]
pub struct MetricsPoller {
    task: JoinHandle<()>,
}

impl MetricsPoller {
    /// Poll immediately, then every `interval`
    ///
    /// Must be called inside a tokio runtime. The task also ends once every
    /// receiver is gone.
    pub fn spawn(
        client: MetricsClient,
        interval: Duration,
    ) -> (MetricsPoller, watch::Receiver<DashboardMetrics>) {
        let (tx, rx) = watch::channel(DashboardMetrics::default());
        let period = interval.max(MIN_INTERVAL);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let metrics = client.poll_once().await;
                if tx.send(metrics).is_err() {
                    tracing::debug!("No metrics subscribers left, stopping poller");
                    break;
                }
            }
        });

        tracing::info!("Metrics poller started, interval {:?}", period);
        (MetricsPoller { task }, rx)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for MetricsPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
