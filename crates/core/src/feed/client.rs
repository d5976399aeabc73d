use crate::config::Settings;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::ward::{WardRecord, WardsResponse};
use crate::feed::error::FetchError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;

pub const DASHBOARD_PATH: &str = "/api/dashboard";
pub const WARDS_PATH: &str = "/api/wards";

// Keeps error messages readable when the server answers with an HTML page.
const ERROR_BODY_PREVIEW: usize = 200;

#[async_trait::async_trait]
pub trait FeedClient: Send + Sync {
    async fn fetch_dashboard(&self) -> Result<DashboardSnapshot>;

    async fn fetch_wards(&self) -> Result<WardsResponse>;
}

/// Plain GET-and-decode client. No retries: a failed request is reported to
/// the caller, who decides whether to try again.
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFeedClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()
            .context("failed to build feed http client")?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "fetching feed");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transport(endpoint, e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| FetchError::transport(endpoint, format!("failed to read body: {e}")))?;

        if !status.is_success() {
            let preview: String = text.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(FetchError::http(endpoint, status, preview).into());
        }

        let parsed = serde_json::from_str::<T>(&text).map_err(|e| {
            FetchError::http(endpoint, status, format!("response does not match schema: {e}"))
        })?;
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_dashboard(&self) -> Result<DashboardSnapshot> {
        let snapshot: DashboardSnapshot = self.get_json(DASHBOARD_PATH).await?;
        tracing::info!(
            alerts = snapshot.alerts.len(),
            ward_risks = snapshot.ward_risks.len(),
            last_updated = %snapshot.last_updated,
            "fetched dashboard snapshot"
        );
        Ok(snapshot)
    }

    async fn fetch_wards(&self) -> Result<WardsResponse> {
        let resp: WardsResponse = self.get_json(WARDS_PATH).await?;
        audit_wards(&resp);
        tracing::info!(count = resp.count, wards = resp.wards.len(), "fetched wards");
        Ok(resp)
    }
}

/// Logs data-quality problems without rejecting the payload; the feed is
/// trusted and the views render whatever arrived.
fn audit_wards(resp: &WardsResponse) {
    if resp.count != resp.wards.len() as u64 {
        tracing::warn!(
            count = resp.count,
            wards = resp.wards.len(),
            "wards count does not match payload length"
        );
    }

    let mut seen = HashSet::with_capacity(resp.wards.len());
    for ward in &resp.wards {
        if !seen.insert(ward.name.as_str()) {
            tracing::warn!(ward = %ward.name, "duplicate ward name in snapshot");
        }
        if let Some(field) = out_of_domain_field(ward) {
            tracing::warn!(ward = %ward.name, field, "negative or non-finite reading");
        }
    }
}

fn out_of_domain_field(ward: &WardRecord) -> Option<&'static str> {
    let readings = [
        ("avg_AQI", ward.avg_aqi),
        ("pm2_5", ward.pm2_5),
        ("pm10", ward.pm10),
        ("distance_km", ward.distance_km),
        ("traffic_raw", ward.traffic_raw),
    ];
    readings
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v < 0.0)
        .map(|(name, _)| name)
}
