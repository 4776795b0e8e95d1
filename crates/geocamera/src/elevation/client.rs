//! HTTP source for ground elevation.
//!
//! [`OpenTopoData`] queries an Open Topo Data compatible API for the ground
//! elevation of a single [`ElevationKey`]. The [`ElevationSource`] trait is the
//! seam the cache fetches through, so alternative sources (or scripted ones
//! in tests) can be plugged in.

use std::{future::Future, pin::Pin, time::Duration};

use serde::Deserialize;

use super::ElevationKey;
use crate::error::{Error, Result};

/// Base URL for the public Open Topo Data API.
const BASE_URL: &str = "https://api.opentopodata.org/v1/";

/// Default dataset: ASTER global DEM at 30 m resolution.
const DATASET: &str = "aster30m";

/// User agent for API requests.
const USER_AGENT: &str = concat!("geocamera/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(10);

/// Future type for elevation fetches.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<f32>> + Send + 'a>>;

/// A remote source of ground elevation.
pub trait ElevationSource: Send + Sync + 'static {
    /// Fetch the ground elevation in meters for the cell named by `key`.
    fn fetch<'a>(&'a self, key: &'a ElevationKey) -> FetchFuture<'a>;
}

/// Settings for elevation lookups.
#[derive(Debug, Clone)]
pub struct ElevationConfig {
    /// API root, e.g. `https://api.opentopodata.org/v1/`.
    pub base_url: String,
    /// Dataset name appended to the base URL.
    pub dataset: String,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Maximum number of cached elevations. `None` never evicts.
    pub max_entries: Option<usize>,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            dataset: DATASET.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Some(TIMEOUT),
            max_entries: None,
        }
    }
}

/// Response body of a point query.
#[derive(Debug, Clone, Deserialize)]
pub struct ElevationResponse {
    pub results: Vec<ElevationResult>,
}

/// One queried location in an [`ElevationResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ElevationResult {
    pub dataset: String,
    /// Ground elevation in meters; `null` where the dataset has no data.
    pub elevation: Option<f32>,
    pub location: ResultLocation,
}

/// Location the API snapped a query to.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResultLocation {
    pub lat: f32,
    #[serde(alias = "lng")]
    pub lon: f32,
}

impl ElevationResponse {
    /// Elevation of the first result.
    pub fn first_elevation(&self) -> Result<f32> {
        let first = self.results.first().ok_or_else(|| Error::InvalidData {
            context: "elevation response",
            detail: "no results".to_string(),
        })?;

        first.elevation.ok_or_else(|| Error::InvalidData {
            context: "elevation response",
            detail: format!(
                "no {} data at {},{}",
                first.dataset, first.location.lat, first.location.lon
            ),
        })
    }
}

/// Elevation source backed by an Open Topo Data compatible HTTP API.
///
/// # Example
///
/// ```ignore
/// let source = OpenTopoData::new(&ElevationConfig::default())?;
/// let elevation = source.fetch(&ElevationKey::from_coordinates(46.558, 7.98)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenTopoData {
    http: reqwest::Client,
    base_url: String,
    dataset: String,
}

impl OpenTopoData {
    /// Create a source with an HTTP client built from `config`.
    pub fn new(config: &ElevationConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| Error::Http {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self::with_http(http, config))
    }

    /// Create a source with a custom HTTP client.
    #[must_use]
    pub fn with_http(http: reqwest::Client, config: &ElevationConfig) -> Self {
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http,
            base_url,
            dataset: config.dataset.clone(),
        }
    }

    /// Build the query URL for `key`.
    pub fn request_url(&self, key: &ElevationKey) -> Result<reqwest::Url> {
        let url = format!("{}{}?locations={key}", self.base_url, self.dataset);
        reqwest::Url::parse(&url).map_err(|e| Error::InvalidUrl {
            url,
            message: e.to_string(),
        })
    }

    async fn fetch_elevation(&self, key: &ElevationKey) -> Result<f32> {
        let url = self.request_url(key)?;

        tracing::debug!(%url, "fetching elevation");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ElevationResponse = response.json().await.map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })?;

        body.first_elevation()
    }
}

impl ElevationSource for OpenTopoData {
    fn fetch<'a>(&'a self, key: &'a ElevationKey) -> FetchFuture<'a> {
        Box::pin(self.fetch_elevation(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_aster30m() {
        let config = ElevationConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.dataset, "aster30m");
        assert!(config.max_entries.is_none());
    }

    #[test]
    fn test_request_url() {
        let source = OpenTopoData::new(&ElevationConfig::default()).unwrap();
        let url = source
            .request_url(&ElevationKey::from_coordinates(57.688, 11.977))
            .unwrap();
        assert_eq!(url.host_str(), Some("api.opentopodata.org"));
        assert_eq!(url.path(), "/v1/aster30m");
        let (name, value) = url.query_pairs().next().unwrap();
        assert_eq!(name, "locations");
        assert_eq!(value, "57.688,11.977");
    }

    #[test]
    fn test_request_url_appends_missing_slash() {
        let config = ElevationConfig {
            base_url: "http://localhost:5000/v1".to_string(),
            dataset: "srtm90m".to_string(),
            ..ElevationConfig::default()
        };
        let source = OpenTopoData::new(&config).unwrap();
        let url = source
            .request_url(&ElevationKey::from_coordinates(1.0, 2.0))
            .unwrap();
        assert_eq!(url.path(), "/v1/srtm90m");
    }

    #[test]
    fn test_malformed_base_url() {
        let config = ElevationConfig {
            base_url: "not a url".to_string(),
            ..ElevationConfig::default()
        };
        let source = OpenTopoData::new(&config).unwrap();
        let err = source
            .request_url(&ElevationKey::from_coordinates(1.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let config = ElevationConfig {
            base_url: "http://127.0.0.1:1/v1/".to_string(),
            timeout: Some(Duration::from_secs(5)),
            ..ElevationConfig::default()
        };
        let source = OpenTopoData::new(&config).unwrap();

        let err = source
            .fetch(&ElevationKey::from_coordinates(1.0, 2.0))
            .await
            .unwrap_err();
        match &err {
            Error::Http { url, .. } => {
                assert_eq!(url, "http://127.0.0.1:1/v1/aster30m?locations=1.000,2.000");
            }
            other => panic!("expected Error::Http, got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("http request to http://127.0.0.1:1/"));
    }

    #[test]
    fn test_decode_first_elevation() {
        let body = r#"{
            "results": [
                {"dataset": "aster30m", "elevation": 45.0, "location": {"lat": 57.688, "lng": 11.977}},
                {"dataset": "aster30m", "elevation": 99.0, "location": {"lat": 57.689, "lng": 11.978}}
            ],
            "status": "OK"
        }"#;
        let response: ElevationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_elevation().unwrap(), 45.0);
    }

    #[test]
    fn test_decode_accepts_lon_field() {
        let body = r#"{"results": [{"dataset": "aster30m", "elevation": 1.5, "location": {"lat": 1.0, "lon": 2.0}}]}"#;
        let response: ElevationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_elevation().unwrap(), 1.5);
        assert_eq!(response.results[0].location.lon, 2.0);
    }

    #[test]
    fn test_empty_results_is_error() {
        let response: ElevationResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(matches!(
            response.first_elevation(),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_null_elevation_is_error() {
        let body = r#"{"results": [{"dataset": "aster30m", "elevation": null, "location": {"lat": 0.0, "lng": 0.0}}]}"#;
        let response: ElevationResponse = serde_json::from_str(body).unwrap();
        assert!(response.first_elevation().is_err());
    }

    #[test]
    fn test_missing_results_fails_to_decode() {
        assert!(serde_json::from_str::<ElevationResponse>(r#"{"error": "bad"}"#).is_err());
    }
}
