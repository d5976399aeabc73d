//! AQI severity tiers and the display palettes.
//!
//! * [`ramp_color`] (the ward-card ramp) is a continuous five-band scale keyed
//!   on the raw AQI value.
//! * [`severity_color`] colors an alert by its severity name.
//! * [`status_color`] colors a ward-risk row by its status name.
//!
//! The named tables have no orange band and fall back to gray for names they
//! do not know. Each only knows its own vocabulary: `good` is gray as an alert
//! severity and `warning` is gray as a ward status. The ramp and
//! [`status_color`] disagree on the 100..200 band (orange vs amber).

use serde::{Deserialize, Serialize};
use std::fmt;

pub const RED: &str = "#EF4444";
pub const AMBER: &str = "#F59E0B";
pub const ORANGE: &str = "#FB923C";
pub const BLUE: &str = "#3B82F6";
pub const GREEN: &str = "#10B981";
pub const GRAY: &str = "#6B7280";

const HAZARDOUS_FLOOR: f64 = 300.0;
const VERY_UNHEALTHY_FLOOR: f64 = 200.0;
const UNHEALTHY_FLOOR: f64 = 100.0;
const MODERATE_FLOOR: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl StatusTier {
    /// Lower bounds are inclusive. Values below zero or NaN are outside the
    /// domain; they land in `Good` rather than panicking.
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi >= HAZARDOUS_FLOOR {
            Self::Hazardous
        } else if aqi >= VERY_UNHEALTHY_FLOOR {
            Self::VeryUnhealthy
        } else if aqi >= UNHEALTHY_FLOOR {
            Self::Unhealthy
        } else if aqi >= MODERATE_FLOOR {
            Self::Moderate
        } else {
            Self::Good
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Unhealthy => "unhealthy",
            Self::VeryUnhealthy => "very_unhealthy",
            Self::Hazardous => "hazardous",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: StatusTier,
    pub color: &'static str,
}

/// Tier plus ward-card color for a single AQI reading.
pub fn classify(aqi: f64) -> Classification {
    Classification {
        tier: StatusTier::from_aqi(aqi),
        color: ramp_color(aqi),
    }
}

/// Ward-card color ramp.
pub fn ramp_color(aqi: f64) -> &'static str {
    match StatusTier::from_aqi(aqi) {
        StatusTier::Hazardous => RED,
        StatusTier::VeryUnhealthy => AMBER,
        StatusTier::Unhealthy => ORANGE,
        StatusTier::Moderate => BLUE,
        StatusTier::Good => GREEN,
    }
}

/// Alert palette keyed by severity name.
pub fn severity_color(severity: &str) -> &'static str {
    match severity {
        "critical" => RED,
        "warning" => AMBER,
        "emerging" => BLUE,
        _ => GRAY,
    }
}

/// Ward-risk palette keyed by status name.
pub fn status_color(status: &str) -> &'static str {
    match status {
        "critical" | "hazardous" => RED,
        "very_unhealthy" | "unhealthy" => AMBER,
        "moderate" => BLUE,
        "good" => GREEN,
        _ => GRAY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KpiStatus {
    pub text: &'static str,
    /// Style class for the KPI card, not a palette key.
    pub class: &'static str,
}

pub fn kpi_status(aqi: f64) -> KpiStatus {
    let tier = StatusTier::from_aqi(aqi);
    let class = match tier {
        StatusTier::Hazardous => "critical",
        StatusTier::VeryUnhealthy => "warning",
        StatusTier::Unhealthy | StatusTier::Moderate => "moderate",
        StatusTier::Good => "good",
    };
    KpiStatus {
        text: tier.label(),
        class,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Worsening,
    Improving,
}

impl TrendDirection {
    /// Any `+` in the KPI trend string means AQI went up.
    pub fn from_label(trend: &str) -> Self {
        if trend.contains('+') {
            Self::Worsening
        } else {
            Self::Improving
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Worsening => "Worsening",
            Self::Improving => "Improving",
        }
    }
}

/// Numeric part of a trend label such as `"+12%"`: digits and `-` only.
pub fn trend_value(trend: &str) -> Option<i64> {
    let digits: String = trend
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_lower_bounds_are_inclusive() {
        assert_eq!(classify(300.0).tier, StatusTier::Hazardous);
        assert_eq!(classify(299.99).tier, StatusTier::VeryUnhealthy);
        assert_eq!(classify(200.0).tier, StatusTier::VeryUnhealthy);
        assert_eq!(classify(100.0).tier, StatusTier::Unhealthy);
        assert_eq!(classify(99.9).tier, StatusTier::Moderate);
        assert_eq!(classify(50.0).tier, StatusTier::Moderate);
        assert_eq!(classify(49.99).tier, StatusTier::Good);
    }

    #[test]
    fn ramp_colors_cover_every_band() {
        for aqi in [300.0, 412.0, 1000.0] {
            assert_eq!(ramp_color(aqi), RED);
        }
        for aqi in [0.0, 12.0, 49.9] {
            assert_eq!(ramp_color(aqi), GREEN);
        }
        assert_eq!(ramp_color(250.0), AMBER);
        assert_eq!(ramp_color(150.0), ORANGE);
        assert_eq!(ramp_color(75.0), BLUE);
    }

    #[test]
    fn severity_table_knows_only_alert_levels() {
        assert_eq!(severity_color("critical"), RED);
        assert_eq!(severity_color("warning"), AMBER);
        assert_eq!(severity_color("emerging"), BLUE);
        assert_eq!(severity_color("Critical"), GRAY);
        assert_eq!(severity_color(""), GRAY);

        // Status names mean nothing to the alert table.
        assert_eq!(severity_color("good"), GRAY);
        assert_eq!(severity_color("hazardous"), GRAY);
        assert_eq!(severity_color("unhealthy"), GRAY);
    }

    #[test]
    fn status_table_knows_only_status_names() {
        assert_eq!(status_color("critical"), RED);
        assert_eq!(status_color("hazardous"), RED);
        assert_eq!(status_color("very_unhealthy"), AMBER);
        assert_eq!(status_color("unhealthy"), AMBER);
        assert_eq!(status_color("moderate"), BLUE);
        assert_eq!(status_color("good"), GREEN);

        assert_eq!(status_color("warning"), GRAY);
        assert_eq!(status_color("emerging"), GRAY);
    }

    #[test]
    fn ramp_and_status_table_disagree_on_unhealthy_band() {
        let aqi = 150.0;
        assert_eq!(ramp_color(aqi), ORANGE);
        assert_eq!(status_color(StatusTier::from_aqi(aqi).as_str()), AMBER);
    }

    #[test]
    fn kpi_status_labels_and_classes() {
        assert_eq!(kpi_status(342.0), KpiStatus { text: "Hazardous", class: "critical" });
        assert_eq!(kpi_status(214.0).text, "Very Unhealthy");
        assert_eq!(kpi_status(214.0).class, "warning");
        assert_eq!(kpi_status(120.0).text, "Unhealthy");
        assert_eq!(kpi_status(120.0).class, "moderate");
        assert_eq!(kpi_status(10.0).text, "Good");
    }

    #[test]
    fn out_of_domain_input_does_not_panic() {
        assert_eq!(classify(-5.0).tier, StatusTier::Good);
        assert_eq!(classify(f64::NAN).color, GREEN);
    }

    #[test]
    fn trend_direction_and_value() {
        assert_eq!(TrendDirection::from_label("+12%"), TrendDirection::Worsening);
        assert_eq!(TrendDirection::from_label("-3%"), TrendDirection::Improving);
        assert_eq!(TrendDirection::from_label("0%"), TrendDirection::Improving);
        assert_eq!(trend_value("+12%"), Some(12));
        assert_eq!(trend_value("-3%"), Some(-3));
        assert_eq!(trend_value("n/a"), None);
    }

    #[test]
    fn tier_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(StatusTier::VeryUnhealthy).unwrap(),
            serde_json::json!("very_unhealthy")
        );
    }
}
