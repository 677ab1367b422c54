//! Engine-emitted events.
//!
//! Selection and address subscribers receive the payload types directly
//! ([`crate::selection::ResolvedSelection`], [`crate::address::NavigableAddress`]);
//! only access denials get a dedicated event shape.

use crate::policy::{CollabAction, DenyReason};
use plat_api::PlanLevel;
use serde::{Deserialize, Serialize};

/// A denied collaboration attempt the UI should surface.
///
/// The engine emits these for plan-gated denials, where an upgrade prompt
/// is actionable. Hard denials (toggle off, private map) return through
/// the [`crate::policy::AccessDecision`] without an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDenied {
    pub action: CollabAction,
    pub reason: DenyReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_plan: Option<PlanLevel>,
    pub current_plan: PlanLevel,
}
