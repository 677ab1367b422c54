//! Collaboration access policy.
//!
//! Pure decision logic: no I/O, no engine state. The engine feeds it a map
//! config, the actor's effective plan, and resolved [`RoleFlags`]; it gets
//! back an [`AccessDecision`] it can act on or surface to the UI.

use crate::role::RoleFlags;
use plat_api::{MapConfig, MapVisibility, PlanLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collaborative actions a visitor can attempt on someone else's map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollabAction {
    /// Drop a pin.
    Pins,
    /// Draw an area post.
    Areas,
    /// Write a text post.
    Posts,
    /// Record a map click (analytics opt-in maps only).
    Clicks,
}

impl CollabAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollabAction::Pins => "pins",
            CollabAction::Areas => "areas",
            CollabAction::Posts => "posts",
            CollabAction::Clicks => "clicks",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "pins" => Some(CollabAction::Pins),
            "areas" => Some(CollabAction::Areas),
            "posts" => Some(CollabAction::Posts),
            "clicks" => Some(CollabAction::Clicks),
            _ => None,
        }
    }

    /// The owner's on/off switch for this action.
    fn toggle(&self, map: &MapConfig) -> bool {
        match self {
            CollabAction::Pins => map.allow_pins,
            CollabAction::Areas => map.allow_areas,
            CollabAction::Posts => map.allow_posts,
            CollabAction::Clicks => map.allow_clicks,
        }
    }

    /// Minimum plan tier the owner requires for this action, if any.
    fn required_plan(&self, map: &MapConfig) -> Option<PlanLevel> {
        match self {
            CollabAction::Pins => map.pins_required_plan,
            CollabAction::Areas => map.areas_required_plan,
            CollabAction::Posts => map.posts_required_plan,
            CollabAction::Clicks => map.clicks_required_plan,
        }
    }
}

impl fmt::Display for CollabAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DenyReason {
    /// The action is off for this actor: toggle disabled, or a private map
    /// they are not a member of. Not fixable by upgrading.
    NotAllowed,
    /// The action is open but gated behind a higher plan tier.
    PlanRequired,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
    /// Tier that would unlock the action. Set only for `PlanRequired`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_plan: Option<PlanLevel>,
    pub current_plan: PlanLevel,
}

impl AccessDecision {
    pub fn allow(current_plan: PlanLevel) -> Self {
        Self {
            allowed: true,
            reason: None,
            required_plan: None,
            current_plan,
        }
    }

    pub fn not_allowed(current_plan: PlanLevel) -> Self {
        Self {
            allowed: false,
            reason: Some(DenyReason::NotAllowed),
            required_plan: None,
            current_plan,
        }
    }

    pub fn plan_required(required: PlanLevel, current_plan: PlanLevel) -> Self {
        Self {
            allowed: false,
            reason: Some(DenyReason::PlanRequired),
            required_plan: Some(required),
            current_plan,
        }
    }

    pub fn is_denied(&self) -> bool {
        !self.allowed
    }
}

/// Decide whether `flags` may perform `action` on `map`.
///
/// Checks run in order: owner bypass, toggle, private-map membership, plan
/// gate. The owner bypass uses the resolved flags, so an owner previewing
/// the map as a lesser role hits the later checks like anyone else.
pub fn evaluate(
    action: CollabAction,
    map: &MapConfig,
    plan: PlanLevel,
    flags: RoleFlags,
) -> AccessDecision {
    if flags.is_owner {
        return AccessDecision::allow(plan);
    }

    if !action.toggle(map) {
        return AccessDecision::not_allowed(plan);
    }

    if map.visibility == MapVisibility::Private && !flags.is_member {
        return AccessDecision::not_allowed(plan);
    }

    if let Some(required) = action.required_plan(map) {
        if plan < required {
            return AccessDecision::plan_required(required, plan);
        }
    }

    AccessDecision::allow(plan)
}
