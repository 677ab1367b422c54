//! Production backend speaking JSON over HTTP.

use crate::{
    backend::MapBackend,
    error::ApiError,
    plan::{PlanFeatureSet, PlanLevel},
    types::{
        AccountId, BoundaryDetail, BoundaryLayer, LatLng, MapId, MembershipRecord, PinId,
        PinSummary,
    },
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Default per-request timeout. A stuck request surfaces as a transient
/// fetch failure instead of stalling selection resolution indefinitely.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl HttpConfig {
    /// Build a config with the default timeout.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Url::join treats the last path segment as a file unless the base
        // ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// [`MapBackend`] over the platform's JSON/HTTP API.
///
/// 404 responses map to `Ok(None)`; any other non-success status is an
/// [`ApiError::Status`].
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base: config.base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ApiError> {
        tracing::debug!(%url, "platform fetch");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: url.path().to_string(),
            });
        }

        Ok(Some(response.json().await?))
    }
}

#[derive(serde::Deserialize)]
struct ReverseGeocodeBody {
    #[serde(default)]
    address: Option<String>,
}

#[async_trait]
impl MapBackend for HttpBackend {
    async fn fetch_pin(&self, id: &PinId) -> Result<Option<PinSummary>, ApiError> {
        let url = self.endpoint(&format!("api/pins/{id}"))?;
        self.get_json(url).await
    }

    async fn resolve_boundary(
        &self,
        layer: BoundaryLayer,
        entity_id: &str,
    ) -> Result<Option<BoundaryDetail>, ApiError> {
        let url = self.endpoint(&format!("api/boundaries/{layer}/{entity_id}"))?;
        self.get_json(url).await
    }

    async fn reverse_geocode(&self, location: LatLng) -> Result<Option<String>, ApiError> {
        let mut url = self.endpoint("api/geocode/reverse")?;
        url.query_pairs_mut()
            .append_pair("lat", &location.lat.to_string())
            .append_pair("lng", &location.lng.to_string());

        let body: Option<ReverseGeocodeBody> = self.get_json(url).await?;
        Ok(body.and_then(|b| b.address))
    }

    async fn fetch_membership(
        &self,
        map: &MapId,
        account: &AccountId,
    ) -> Result<Option<MembershipRecord>, ApiError> {
        let url = self.endpoint(&format!("api/maps/{map}/members/{account}"))?;
        self.get_json(url).await
    }

    async fn fetch_plan_limits(
        &self,
        level: PlanLevel,
    ) -> Result<Option<PlanFeatureSet>, ApiError> {
        let url = self.endpoint(&format!("api/plans/{}", level.as_str()))?;
        self.get_json(url).await
    }
}
