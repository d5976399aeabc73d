use std::fmt::{self, Write};
use wardaqi_core::view::wards::display_round;
use wardaqi_core::view::{DashboardDigest, DashboardState, WardCard};

pub fn dashboard(state: &DashboardState, digest: Option<&DashboardDigest<'_>>) -> Result<String, fmt::Error> {
    let mut out = String::new();

    let digest = match (state, digest) {
        (DashboardState::Loading, _) => return Ok("Loading Delhi pollution data...\n".to_string()),
        (DashboardState::Failed { error }, _) => {
            writeln!(out, "Unable to load dashboard")?;
            writeln!(out, "{error}")?;
            writeln!(out, "Press Enter to retry.")?;
            return Ok(out);
        }
        (DashboardState::Ready { .. }, Some(d)) => d,
        (DashboardState::Ready { .. }, None) => return Ok(out),
    };

    writeln!(out, "Delhi Pollution Command Center")?;
    if let Some(at) = digest.updated_at {
        writeln!(out, "Updated {}", at.format("%H:%M:%S"))?;
    }
    if let Some(err) = state.error() {
        writeln!(out, "(refresh failed, showing last data: {err})")?;
    }

    let kpis = digest.kpis;
    writeln!(out)?;
    writeln!(out, "City AQI       {:>4}  {}", kpis.city_aqi, digest.city.text)?;
    writeln!(out, "Worst ward     {:>4}  {}", kpis.worst_ward, digest.worst.text)?;
    writeln!(out, "Critical wards {:>4}", kpis.critical_count)?;
    writeln!(out, "Trend          {:>4}  {}", kpis.trend, digest.trend.label())?;

    writeln!(out)?;
    writeln!(out, "Priority pollution alerts ({} active)", digest.alerts.len())?;
    for line in &digest.alerts {
        let a = line.alert;
        writeln!(
            out,
            "  [{}] {:<16} {:<24} AQI {:>3}  {}",
            a.severity, a.alert_type, a.ward, a.aqi, a.time
        )?;
    }

    writeln!(out)?;
    let series: Vec<String> = digest.trend_series.iter().map(|v| display_round(*v).to_string()).collect();
    writeln!(out, "AQI trend ({}): {}", digest.timeframe, series.join(" "))?;

    writeln!(out)?;
    writeln!(out, "Pollution source rankings")?;
    for line in &digest.ward_risks {
        let r = line.risk;
        writeln!(
            out,
            "  #{:<3} {:<24} {:>4}  {:<6} {} {:<12} {}",
            r.rank, r.ward, r.aqi, r.pollutant, line.glyph, r.source, r.status
        )?;
    }

    let s = digest.city_summary;
    writeln!(out)?;
    writeln!(
        out,
        "Ward distribution ({} wards): good {} | moderate {} | unhealthy {} | very unhealthy {} | hazardous {}",
        s.total(),
        s.good,
        s.moderate,
        s.unhealthy,
        s.very_unhealthy,
        s.hazardous
    )?;

    Ok(out)
}

pub fn wards(count: u64, cards: &[WardCard<'_>]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Ward-level pollution source analysis: {count} Delhi wards ({} shown)",
        cards.len()
    )?;

    if cards.is_empty() {
        writeln!(out, "No wards found matching your criteria")?;
        return Ok(out);
    }

    for card in cards {
        let w = card.ward;
        let marker = if card.highlighted { '*' } else { ' ' };
        writeln!(
            out,
            "{marker} {:<28} AQI {:>4} [{}]  PM2.5 {:>4}  PM10 {:>4}  station {:.1}km",
            w.name,
            display_round(w.avg_aqi),
            card.tier.label(),
            display_round(w.pm2_5),
            display_round(w.pm10),
            w.distance_km
        )?;
        writeln!(
            out,
            "  vehicular {:>3}%  industrial {:>3}%  primary {} {}  traffic score {}  industrial sites {}",
            display_round(w.vehicular_pct),
            display_round(w.industrial_pct),
            card.source_glyph,
            card.primary_source,
            display_round(w.traffic_raw),
            w.industrial_count
        )?;
    }

    Ok(out)
}
