//! Wire types shared between the engine and the map platform.
//!
//! Everything here crosses the JSON boundary, so field names follow the
//! platform's camelCase convention via serde renames. Engine-only state
//! (selection intents, resolved selections) lives in the core crate instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Pin identifier, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PinId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Map identifier, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(String);

impl MapId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MapId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Geographic point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are real numbers (not NaN or infinite).
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Administrative boundary layers served by the platform.
///
/// Closed set: the reference deployment covers one US state, its counties,
/// its cities/townships/unorganized territories, and legislative districts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryLayer {
    State,
    County,
    /// City, township, or unorganized territory unit.
    Ctu,
    District,
}

impl BoundaryLayer {
    /// Canonical lowercase wire name, as used in navigable addresses.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryLayer::State => "state",
            BoundaryLayer::County => "county",
            BoundaryLayer::Ctu => "ctu",
            BoundaryLayer::District => "district",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the closed set.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "state" => Some(BoundaryLayer::State),
            "county" => Some(BoundaryLayer::County),
            "ctu" => Some(BoundaryLayer::Ctu),
            "district" => Some(BoundaryLayer::District),
            _ => None,
        }
    }
}

impl fmt::Display for BoundaryLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author info attached to a pin summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinAccount {
    pub id: AccountId,
    pub username: String,
    /// Avatar URL. Present only in fully hydrated summaries.
    pub image_url: Option<String>,
}

/// How much of a pin summary has been materialized.
///
/// Map tiles embed partial summaries (enough to render a marker and a
/// popup skeleton). The detail fetch produces the full summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    Partial,
    Full,
}

/// Pin content as served by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinSummary {
    pub id: PinId,
    pub location: LatLng,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub account: Option<PinAccount>,
}

impl PinSummary {
    /// Whether this summary is fully hydrated.
    ///
    /// The author's avatar is the last field the platform fills in, so its
    /// presence marks a full summary.
    pub fn hydration(&self) -> Hydration {
        if self.account.as_ref().is_some_and(|a| a.image_url.is_some()) {
            Hydration::Full
        } else {
            Hydration::Partial
        }
    }
}

/// Resolved boundary entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryDetail {
    pub layer: BoundaryLayer,
    /// Layer-scoped identifier (FIPS code, district number, CTU slug).
    pub entity_id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<LatLng>,
    /// Layer-specific extras the engine passes through untouched.
    #[serde(default)]
    pub properties: serde_json::Value,
}

/// Role a member holds in a map's collaboration group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Owner,
    Manager,
    Editor,
}

/// Membership record for one account on one map.
///
/// Absence of a record means the account is not a member; the backend
/// reports that as `Ok(None)`, never as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}
