use reqwest::StatusCode;
use std::fmt;

/// The one failure the views know about: a feed request that did not yield a
/// usable payload (transport error, non-2xx status, or a body that does not
/// decode).
#[derive(Debug, Clone)]
pub struct FetchError {
    pub endpoint: &'static str,
    pub status: Option<StatusCode>,
    pub detail: String,
}

impl FetchError {
    pub fn transport(endpoint: &'static str, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            status: None,
            detail: detail.into(),
        }
    }

    pub fn http(endpoint: &'static str, status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            status: Some(status),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "fetch {} failed (HTTP {status}): {}",
                self.endpoint, self.detail
            ),
            None => write!(f, "fetch {} failed: {}", self.endpoint, self.detail),
        }
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_when_present() {
        let err = FetchError::http("/api/wards", StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(
            err.to_string(),
            "fetch /api/wards failed (HTTP 502 Bad Gateway): upstream down"
        );

        let err = FetchError::transport("/api/dashboard", "connection refused");
        assert_eq!(err.to_string(), "fetch /api/dashboard failed: connection refused");
    }

    #[test]
    fn survives_a_trip_through_anyhow() {
        let err: anyhow::Error = FetchError::transport("/api/wards", "timeout").into();
        assert!(err.downcast_ref::<FetchError>().is_some());
    }
}
