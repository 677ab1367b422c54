//! Plan tiers and billing entitlements.

use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier, least to most capable.
///
/// Variant order is load-bearing: the derived `Ord` gives
/// `Hobby < Contributor < Professional < Business`, which is how plan gates
/// compare an actor's tier against a requirement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    Hobby,
    Contributor,
    Professional,
    Business,
}

impl PlanLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanLevel::Hobby => "hobby",
            PlanLevel::Contributor => "contributor",
            PlanLevel::Professional => "professional",
            PlanLevel::Business => "business",
        }
    }

    /// Parse a plan slug. Returns `None` for unknown tiers.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "hobby" => Some(PlanLevel::Hobby),
            "contributor" => Some(PlanLevel::Contributor),
            "professional" => Some(PlanLevel::Professional),
            "business" => Some(PlanLevel::Business),
            _ => None,
        }
    }
}

impl fmt::Display for PlanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entitlements attached to one plan tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatureSet {
    pub slug: String,
    pub level: PlanLevel,
    /// Maximum maps the account may own. `None` means unlimited.
    #[serde(default)]
    pub map_limit: Option<u32>,
    /// Maximum collaborators per map. `None` means unlimited.
    #[serde(default)]
    pub collaborator_limit: Option<u32>,
}

/// The acting user, as the engine sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub account_id: AccountId,
    pub plan: PlanLevel,
    pub subscription_active: bool,
}

impl Actor {
    pub fn new(account_id: impl Into<AccountId>, plan: PlanLevel) -> Self {
        Self {
            account_id: account_id.into(),
            plan,
            subscription_active: true,
        }
    }

    /// Tier used for plan gating.
    ///
    /// A lapsed subscription gates like `Hobby` without touching the stored
    /// plan, so reactivation restores the old tier.
    pub fn effective_plan(&self) -> PlanLevel {
        if self.subscription_active {
            self.plan
        } else {
            PlanLevel::Hobby
        }
    }
}
