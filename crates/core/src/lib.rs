pub mod classify;
pub mod domain;
pub mod feed;
pub mod query;
pub mod view;

pub mod config {
    use std::time::Duration;

    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
    pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_REFRESH_SECS: u64 = 5 * 60;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: String,
        pub http_timeout_secs: u64,
        pub refresh_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
                refresh_secs: DEFAULT_REFRESH_SECS,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let api_base_url = lookup("WARDAQI_API_BASE_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

            let http_timeout_secs = lookup("WARDAQI_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

            let refresh_secs = lookup("WARDAQI_REFRESH_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_REFRESH_SECS);

            let settings = Self {
                api_base_url,
                http_timeout_secs,
                refresh_secs,
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
            };
            settings.validate()?;
            Ok(settings)
        }

        fn validate(&self) -> anyhow::Result<()> {
            anyhow::ensure!(
                self.http_timeout_secs > 0,
                "WARDAQI_HTTP_TIMEOUT_SECS must be positive"
            );
            anyhow::ensure!(self.refresh_secs > 0, "WARDAQI_REFRESH_SECS must be positive");
            anyhow::ensure!(
                self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"),
                "WARDAQI_API_BASE_URL must be an http(s) URL (got {})",
                self.api_base_url
            );
            Ok(())
        }

        pub fn refresh_period(&self) -> Duration {
            Duration::from_secs(self.refresh_secs)
        }
    }

}
