//! Backend abstraction for platform fetches.
//!
//! The [`MapBackend`] trait enables dependency injection for testing,
//! allowing both real HTTP communication ([`HttpBackend`](crate::HttpBackend))
//! and mocks ([`MockBackend`](crate::test::MockBackend)) to be used
//! interchangeably.

use crate::{
    error::ApiError,
    plan::{PlanFeatureSet, PlanLevel},
    types::{
        AccountId, BoundaryDetail, BoundaryLayer, LatLng, MapId, MembershipRecord, PinId,
        PinSummary,
    },
};
use async_trait::async_trait;

/// Read-side platform API the selection engine depends on.
///
/// Every method distinguishes three outcomes: `Ok(Some(_))` for a hit,
/// `Ok(None)` for an entity that does not exist, and `Err(_)` for a fetch
/// that could not complete. Callers render the last two the same way
/// (absent detail), but failures are logged and worth retrying later.
#[async_trait]
pub trait MapBackend: Send + Sync {
    /// Fetch the full summary for a pin.
    async fn fetch_pin(&self, id: &PinId) -> Result<Option<PinSummary>, ApiError>;

    /// Resolve a boundary entity within a layer.
    async fn resolve_boundary(
        &self,
        layer: BoundaryLayer,
        entity_id: &str,
    ) -> Result<Option<BoundaryDetail>, ApiError>;

    /// Reverse-geocode a point to a human-readable label.
    ///
    /// `Ok(None)` means the geocoder had nothing for this location.
    async fn reverse_geocode(&self, location: LatLng) -> Result<Option<String>, ApiError>;

    /// Fetch the acting account's membership record for a map.
    ///
    /// `Ok(None)` means the account is not a member.
    async fn fetch_membership(
        &self,
        map: &MapId,
        account: &AccountId,
    ) -> Result<Option<MembershipRecord>, ApiError>;

    /// Fetch entitlements for a plan tier.
    async fn fetch_plan_limits(
        &self,
        level: PlanLevel,
    ) -> Result<Option<PlanFeatureSet>, ApiError>;
}
