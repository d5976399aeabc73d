use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregate payload behind the landing dashboard (`GET /api/dashboard`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub kpis: Kpis,
    pub alerts: Vec<Alert>,
    pub trend_data: TrendData,
    pub ward_risks: Vec<WardRisk>,
    pub city_summary: CitySummary,
    pub last_updated: String,
}

impl DashboardSnapshot {
    /// `lastUpdated` is written by the feed as a naive local ISO timestamp;
    /// an offset form is accepted too.
    pub fn last_updated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.last_updated.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub city_aqi: i64,
    pub worst_ward: i64,
    pub critical_count: i64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub ward: String,
    pub aqi: i64,
    pub severity: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardRisk {
    pub rank: u32,
    pub ward: String,
    pub aqi: i64,
    pub pollutant: String,
    pub source: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    pub good: u64,
    pub moderate: u64,
    pub unhealthy: u64,
    pub very_unhealthy: u64,
    pub hazardous: u64,
}

impl CitySummary {
    pub fn total(&self) -> u64 {
        self.good + self.moderate + self.unhealthy + self.very_unhealthy + self.hazardous
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendData {
    #[serde(rename = "7days", default)]
    pub seven_days: Vec<f64>,
    #[serde(rename = "30days", default)]
    pub thirty_days: Vec<f64>,
    #[serde(rename = "90days", default)]
    pub ninety_days: Vec<f64>,
}

impl TrendData {
    pub fn series(&self, timeframe: Timeframe) -> &[f64] {
        match timeframe {
            Timeframe::SevenDays => &self.seven_days,
            Timeframe::ThirtyDays => &self.thirty_days,
            Timeframe::NinetyDays => &self.ninety_days,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Timeframe {
    #[default]
    SevenDays,
    ThirtyDays,
    NinetyDays,
}

impl Timeframe {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SevenDays => "7days",
            Self::ThirtyDays => "30days",
            Self::NinetyDays => "90days",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7days" => Ok(Self::SevenDays),
            "30days" => Ok(Self::ThirtyDays),
            "90days" => Ok(Self::NinetyDays),
            other => anyhow::bail!("unknown timeframe: {other} (expected 7days, 30days or 90days)"),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_snapshot_json() -> serde_json::Value {
    serde_json::json!({
        "alerts": [
            {"id": 17, "severity": "critical", "ward": "Anand Vihar", "aqi": 342, "type": "Emergency", "time": "12 min ago"},
            {"id": 4, "severity": "warning", "ward": "Mundka", "aqi": 251, "type": "Forecast Alert", "time": "3 min ago"}
        ],
        "kpis": {"cityAqi": 214, "worstWard": 342, "criticalCount": 41, "trend": "+8%"},
        "trendData": {
            "7days": [201, 215, 230],
            "30days": [180, 190, 201, 215, 230],
            "90days": [150, 180, 190, 201, 215, 230]
        },
        "wardRisks": [
            {"rank": 1, "ward": "Anand Vihar", "aqi": 342, "pollutant": "PM2.5", "source": "Traffic", "status": "hazardous"},
            {"rank": 2, "ward": "Mundka", "aqi": 251, "pollutant": "PM10", "source": "Industrial", "status": "very_unhealthy"}
        ],
        "citySummary": {"good": 0, "moderate": 12, "unhealthy": 97, "veryUnhealthy": 110, "hazardous": 31},
        "lastUpdated": "2026-01-27T10:15:42.123456"
    })
}
