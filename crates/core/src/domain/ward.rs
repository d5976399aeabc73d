use serde::{Deserialize, Deserializer, Serialize};

/// One ward's latest readings, as served by `GET /api/wards`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardRecord {
    pub name: String,
    #[serde(rename = "avg_AQI")]
    pub avg_aqi: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub distance_km: f64,
    pub vehicular_pct: f64,
    pub industrial_pct: f64,
    pub traffic_raw: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub industrial_count: u64,

    // Passthrough columns; not every feed version carries them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqkm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardsResponse {
    pub count: u64,
    pub wards: Vec<WardRecord>,
}

/// Accepts `12` as well as `12.0`. The upstream dataframe turns integer
/// columns into floats after a left join, so both shapes show up.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(v) = n.as_u64() {
        return Ok(v);
    }

    match n.as_f64() {
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(v as u64),
        _ => Err(serde::de::Error::custom(format!(
            "industrial_count must be a non-negative integer (got {n})"
        ))),
    }
}

#[cfg(test)]
pub(crate) fn ward(name: &str, avg_aqi: f64, vehicular_pct: f64, industrial_pct: f64) -> WardRecord {
    WardRecord {
        name: name.to_string(),
        avg_aqi,
        pm2_5: 0.0,
        pm10: 0.0,
        distance_km: 0.0,
        vehicular_pct,
        industrial_pct,
        traffic_raw: 0.0,
        industrial_count: 0,
        location: None,
        area_sqkm: None,
        co: None,
        no2: None,
    }
}
