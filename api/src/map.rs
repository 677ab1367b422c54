//! Per-map collaboration configuration.

use crate::{plan::PlanLevel, types::AccountId, types::MapId};
use serde::{Deserialize, Serialize};

/// Who can see the map at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapVisibility {
    Public,
    Private,
}

/// Map-level collaboration settings, as configured by the owner.
///
/// Each collaborative action has an on/off toggle and an optional plan
/// requirement. Toggles are hard switches; plan requirements only apply
/// when the toggle is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub id: MapId,
    pub owner_account_id: AccountId,
    pub visibility: MapVisibility,
    pub allow_pins: bool,
    pub allow_areas: bool,
    pub allow_posts: bool,
    pub allow_clicks: bool,
    #[serde(default)]
    pub pins_required_plan: Option<PlanLevel>,
    #[serde(default)]
    pub areas_required_plan: Option<PlanLevel>,
    #[serde(default)]
    pub posts_required_plan: Option<PlanLevel>,
    #[serde(default)]
    pub clicks_required_plan: Option<PlanLevel>,
}

impl Default for MapConfig {
    /// Public map with every collaborative action open and no plan gates.
    fn default() -> Self {
        Self {
            id: MapId::new(""),
            owner_account_id: AccountId::new(""),
            visibility: MapVisibility::Public,
            allow_pins: true,
            allow_areas: true,
            allow_posts: true,
            allow_clicks: true,
            pins_required_plan: None,
            areas_required_plan: None,
            posts_required_plan: None,
            clicks_required_plan: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_open() {
        let map = MapConfig::default();
        assert_eq!(map.visibility, MapVisibility::Public);
        assert!(map.allow_pins && map.allow_areas && map.allow_posts && map.allow_clicks);
        assert!(map.pins_required_plan.is_none());
    }

    #[test]
    fn config_parses_platform_json() {
        let json = r#"{
            "id": "map-mn",
            "ownerAccountId": "acct-owner",
            "visibility": "private",
            "allowPins": true,
            "allowAreas": false,
            "allowPosts": true,
            "allowClicks": true,
            "pinsRequiredPlan": "contributor"
        }"#;

        let map: MapConfig = serde_json::from_str(json).expect("valid config");
        assert_eq!(map.visibility, MapVisibility::Private);
        assert!(!map.allow_areas);
        assert_eq!(map.pins_required_plan, Some(PlanLevel::Contributor));
        assert_eq!(map.clicks_required_plan, None);
    }
}
