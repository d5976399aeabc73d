use crate::classify::source::{dominant_source, DominantSource, SourceCategory};
use crate::classify::status::{classify, StatusTier};
use crate::domain::ward::{WardRecord, WardsResponse};
use crate::feed::client::FeedClient;
use crate::query::{process, WardQuery};
use serde::Serialize;

/// Data behind the all-wards list.
#[derive(Debug, Clone, Default)]
pub struct WardsPage {
    pub count: u64,
    pub wards: Vec<WardRecord>,
}

impl From<WardsResponse> for WardsPage {
    fn from(resp: WardsResponse) -> Self {
        Self {
            count: resp.count,
            wards: resp.wards,
        }
    }
}

impl WardsPage {
    /// Fetches the ward list. This view has no error screen: a failed fetch
    /// is logged and leaves the list empty.
    pub async fn load(client: &dyn FeedClient) -> Self {
        match client.fetch_wards().await {
            Ok(resp) => resp.into(),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "error fetching wards");
                Self::default()
            }
        }
    }

    /// Cards for the current view state. `highlight` marks the ward whose
    /// name matches exactly.
    pub fn cards<'a>(&'a self, query: &WardQuery, highlight: Option<&str>) -> Vec<WardCard<'a>> {
        process(&self.wards, query)
            .into_iter()
            .map(|ward| WardCard::new(ward, highlight))
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct WardCard<'a> {
    #[serde(flatten)]
    pub ward: &'a WardRecord,
    pub tier: StatusTier,
    pub color: &'static str,
    pub primary_source: DominantSource,
    pub source_glyph: &'static str,
    pub highlighted: bool,
}

impl<'a> WardCard<'a> {
    pub fn new(ward: &'a WardRecord, highlight: Option<&str>) -> Self {
        let status = classify(ward.avg_aqi);
        let primary_source = dominant_source(ward.vehicular_pct, ward.industrial_pct);
        Self {
            ward,
            tier: status.tier,
            color: status.color,
            primary_source,
            source_glyph: SourceCategory::from(primary_source).glyph(),
            highlighted: highlight == Some(ward.name.as_str()),
        }
    }
}

/// Halves round toward positive infinity, the way the web views print
/// readings.
pub fn display_round(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::status::{ORANGE, RED};
    use crate::domain::dashboard::DashboardSnapshot;
    use crate::domain::ward::ward;
    use crate::query::{SortKey, SourceFilter};
    use anyhow::Result;

    struct FixedFeed(Option<WardsResponse>);

    #[async_trait::async_trait]
    impl FeedClient for FixedFeed {
        async fn fetch_dashboard(&self) -> Result<DashboardSnapshot> {
            anyhow::bail!("not used")
        }

        async fn fetch_wards(&self) -> Result<WardsResponse> {
            self.0.clone().ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    fn page() -> WardsPage {
        WardsPage {
            count: 3,
            wards: vec![
                ward("Rohini", 180.0, 60.0, 20.0),
                ward("Anand Vihar", 342.0, 80.0, 10.0),
                ward("Mundka", 251.0, 50.0, 50.0),
            ],
        }
    }

    #[tokio::test]
    async fn failed_fetch_leaves_an_empty_list() {
        let page = WardsPage::load(&FixedFeed(None)).await;
        assert_eq!(page.count, 0);
        assert!(page.cards(&WardQuery::default(), None).is_empty());
    }

    #[tokio::test]
    async fn successful_fetch_keeps_feed_order() {
        let resp = WardsResponse {
            count: 1,
            wards: vec![ward("Narela", 90.0, 10.0, 5.0)],
        };
        let page = WardsPage::load(&FixedFeed(Some(resp))).await;
        assert_eq!(page.count, 1);
        assert_eq!(page.wards[0].name, "Narela");
    }

    #[test]
    fn cards_carry_status_and_primary_source() {
        let page = page();
        let cards = page.cards(&WardQuery::default(), None);
        assert_eq!(cards[0].ward.name, "Anand Vihar");
        assert_eq!(cards[0].color, RED);
        assert_eq!(cards[0].primary_source, DominantSource::Traffic);
        assert_eq!(cards[2].color, ORANGE);

        // Tie: attributed to industrial even though neither filter keeps it.
        let mundka = cards.iter().find(|c| c.ward.name == "Mundka").unwrap();
        assert_eq!(mundka.primary_source, DominantSource::Industrial);
        assert_eq!(mundka.source_glyph, "🏭");
    }

    #[test]
    fn highlight_is_exact_name_match() {
        let page = page();
        let q = WardQuery::default().with_sort(SortKey::Name);
        let cards = page.cards(&q, Some("Rohini"));
        assert_eq!(cards.iter().filter(|c| c.highlighted).count(), 1);
        assert!(cards.iter().find(|c| c.ward.name == "Rohini").unwrap().highlighted);

        let cards = page.cards(&q, Some("rohini"));
        assert!(cards.iter().all(|c| !c.highlighted));
    }

    #[test]
    fn filter_applies_before_cards_are_built() {
        let page = page();
        let q = WardQuery::default().with_source(SourceFilter::Industrial);
        assert!(page.cards(&q, None).is_empty());
    }

    #[test]
    fn card_serializes_record_fields_inline() {
        let page = page();
        let cards = page.cards(&WardQuery::default(), Some("Anand Vihar"));
        let v = serde_json::to_value(&cards[0]).unwrap();
        assert_eq!(v["name"], "Anand Vihar");
        assert_eq!(v["avg_AQI"], 342.0);
        assert_eq!(v["tier"], "hazardous");
        assert_eq!(v["primary_source"], "Traffic");
        assert_eq!(v["highlighted"], true);
    }

    #[test]
    fn display_round_matches_web_rounding() {
        assert_eq!(display_round(2.5), 3);
        assert_eq!(display_round(2.49), 2);
        assert_eq!(display_round(-2.5), -2);
        assert_eq!(display_round(287.5), 288);
    }
}
