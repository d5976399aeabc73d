use crate::classify::source::source_glyph;
use crate::classify::status::{kpi_status, severity_color, status_color, trend_value, KpiStatus, TrendDirection};
use crate::domain::dashboard::{Alert, CitySummary, DashboardSnapshot, Kpis, Timeframe, WardRisk};
use crate::feed::client::FeedClient;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

/// What the dashboard shows at any moment.
#[derive(Debug, Clone, Default)]
pub enum DashboardState {
    /// Nothing to show yet; a fetch is running.
    #[default]
    Loading,
    /// A snapshot is on screen. `refresh_error` holds the reason the latest
    /// background refresh failed, if it did.
    Ready {
        snapshot: Arc<DashboardSnapshot>,
        refresh_error: Option<String>,
    },
    /// No snapshot could be loaded. Blocking; the user has to retry.
    Failed { error: String },
}

impl DashboardState {
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            Self::Ready { snapshot, .. } => Some(snapshot.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready { refresh_error, .. } => refresh_error.as_deref(),
            Self::Failed { error } => Some(error.as_str()),
            Self::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Folds one fetch outcome into the state. A failure while a snapshot is
    /// on screen keeps that snapshot.
    pub fn apply(self, outcome: Result<DashboardSnapshot, String>) -> Self {
        match (self, outcome) {
            (_, Ok(snapshot)) => Self::Ready {
                snapshot: Arc::new(snapshot),
                refresh_error: None,
            },
            (Self::Ready { snapshot, .. }, Err(error)) => Self::Ready {
                snapshot,
                refresh_error: Some(error),
            },
            (_, Err(error)) => Self::Failed { error },
        }
    }
}

/// Dashboard view state plus the client that feeds it. Cheap to clone.
#[derive(Clone)]
pub struct DashboardView {
    client: Arc<dyn FeedClient>,
    state: Arc<watch::Sender<DashboardState>>,
}

impl DashboardView {
    pub fn new(client: Arc<dyn FeedClient>) -> Self {
        let (tx, _rx) = watch::channel(DashboardState::Loading);
        Self {
            client,
            state: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Runs one fetch and publishes the result. Used for the first load, for
    /// every refresh tick and for the manual retry.
    pub async fn load(&self) {
        self.state.send_if_modified(|s| {
            if matches!(s, DashboardState::Failed { .. }) {
                *s = DashboardState::Loading;
                true
            } else {
                false
            }
        });

        let outcome = self
            .client
            .fetch_dashboard()
            .await
            .map_err(|e| format!("{e:#}"));

        if let Err(error) = &outcome {
            if self.state.borrow().snapshot().is_some() {
                tracing::warn!(%error, "dashboard refresh failed; keeping last snapshot");
            } else {
                tracing::error!(%error, "dashboard load failed");
            }
        }

        self.state.send_modify(|s| {
            let prev = std::mem::take(s);
            *s = prev.apply(outcome);
        });
    }

    /// Manual retry from the error screen.
    pub async fn retry(&self) {
        tracing::info!("dashboard retry requested");
        self.load().await;
    }

    /// Starts the view's refresh loop: one fetch right away, then one per
    /// `period` until the returned task is stopped or dropped.
    pub fn mount(&self, period: Duration) -> RefreshTask {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(refresh_loop(self.clone(), period, stop_rx));
        tracing::info!(period_secs = period.as_secs(), "dashboard refresh started");
        RefreshTask {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

// Each tick spawns its own fetch; a slow response can overlap the next tick
// and finish after it.
async fn refresh_loop(view: DashboardView, period: Duration, mut stop: oneshot::Receiver<()>) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut inflight = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let view = view.clone();
                inflight.spawn(async move { view.load().await });
            }
            Some(res) = inflight.join_next(), if !inflight.is_empty() => {
                if let Err(e) = res {
                    if !e.is_cancelled() {
                        tracing::error!(error = %e, "dashboard fetch task panicked");
                    }
                }
            }
        }
    }

    inflight.abort_all();
    tracing::info!("dashboard refresh stopped");
}

/// Handle to a mounted dashboard's refresh loop. Dropping it cancels the loop
/// and any fetch still running.
pub struct RefreshTask {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTask {
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "dashboard refresh loop panicked");
                }
            }
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlertLine<'a> {
    #[serde(flatten)]
    pub alert: &'a Alert,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RiskLine<'a> {
    #[serde(flatten)]
    pub risk: &'a WardRisk,
    pub color: &'static str,
    pub glyph: &'static str,
}

/// Display-ready values derived from one snapshot.
#[derive(Debug, Serialize)]
pub struct DashboardDigest<'a> {
    pub kpis: &'a Kpis,
    pub city: KpiStatus,
    pub worst: KpiStatus,
    pub trend: TrendDirection,
    pub trend_pct: Option<i64>,
    pub timeframe: &'static str,
    pub trend_series: &'a [f64],
    pub alerts: Vec<AlertLine<'a>>,
    pub ward_risks: Vec<RiskLine<'a>>,
    pub city_summary: &'a CitySummary,
    pub updated_at: Option<NaiveDateTime>,
}

impl<'a> DashboardDigest<'a> {
    pub fn new(snapshot: &'a DashboardSnapshot, timeframe: Timeframe) -> Self {
        let alerts = snapshot
            .alerts
            .iter()
            .map(|alert| AlertLine {
                alert,
                color: severity_color(&alert.severity),
            })
            .collect();

        let ward_risks = snapshot
            .ward_risks
            .iter()
            .map(|risk| RiskLine {
                risk,
                color: status_color(&risk.status),
                glyph: source_glyph(&risk.source),
            })
            .collect();

        Self {
            kpis: &snapshot.kpis,
            city: kpi_status(snapshot.kpis.city_aqi as f64),
            worst: kpi_status(snapshot.kpis.worst_ward as f64),
            trend: TrendDirection::from_label(&snapshot.kpis.trend),
            trend_pct: trend_value(&snapshot.kpis.trend),
            timeframe: timeframe.as_str(),
            trend_series: snapshot.trend_data.series(timeframe),
            alerts,
            ward_risks,
            city_summary: &snapshot.city_summary,
            updated_at: snapshot.last_updated_at(),
        }
    }
}
