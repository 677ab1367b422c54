//! Effective role resolution.
//!
//! Access checks never look at membership records directly; they go through
//! [`resolve_role`], which folds the acting account, the map owner, the
//! membership record, and the owner's view-as override into one set of
//! [`RoleFlags`].

use plat_api::{AccountId, MembershipRecord, MembershipRole};
use serde::{Deserialize, Serialize};

/// Role the map owner can impersonate to preview the map as others see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewAsRole {
    Owner,
    Manager,
    Editor,
    /// Preview as a visitor with no membership at all.
    NonMember,
}

impl Default for ViewAsRole {
    fn default() -> Self {
        ViewAsRole::Owner
    }
}

impl ViewAsRole {
    /// The membership role this override simulates, if any.
    pub fn as_membership_role(&self) -> Option<MembershipRole> {
        match self {
            ViewAsRole::Owner => Some(MembershipRole::Owner),
            ViewAsRole::Manager => Some(MembershipRole::Manager),
            ViewAsRole::Editor => Some(MembershipRole::Editor),
            ViewAsRole::NonMember => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewAsRole::Owner => "owner",
            ViewAsRole::Manager => "manager",
            ViewAsRole::Editor => "editor",
            ViewAsRole::NonMember => "nonmember",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "owner" => Some(ViewAsRole::Owner),
            "manager" => Some(ViewAsRole::Manager),
            "editor" => Some(ViewAsRole::Editor),
            "nonmember" => Some(ViewAsRole::NonMember),
            _ => None,
        }
    }
}

/// Flattened role of one account on one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleFlags {
    /// Effective role after any view-as override. `None` for non-members.
    pub role: Option<MembershipRole>,
    pub is_owner: bool,
    pub is_manager: bool,
    pub is_member: bool,
}

impl RoleFlags {
    /// Flags implied by a membership role. Higher roles imply the lower ones.
    pub fn for_role(role: Option<MembershipRole>) -> Self {
        match role {
            Some(MembershipRole::Owner) => Self {
                role,
                is_owner: true,
                is_manager: true,
                is_member: true,
            },
            Some(MembershipRole::Manager) => Self {
                role,
                is_owner: false,
                is_manager: true,
                is_member: true,
            },
            Some(MembershipRole::Editor) => Self {
                role,
                is_owner: false,
                is_manager: false,
                is_member: true,
            },
            None => Self::default(),
        }
    }

    pub fn non_member() -> Self {
        Self::default()
    }
}

/// Resolve the effective role of `acting` on a map owned by `owner`.
///
/// The view-as override applies only when the acting account really is the
/// owner; anyone else keeps whatever their membership record says. An owner
/// viewing as a lesser role genuinely loses the owner bypass, which is the
/// point of the feature.
pub fn resolve_role(
    membership: Option<&MembershipRecord>,
    acting: &AccountId,
    owner: &AccountId,
    view_as: ViewAsRole,
) -> RoleFlags {
    if acting == owner {
        return RoleFlags::for_role(view_as.as_membership_role());
    }
    RoleFlags::for_role(membership.map(|record| record.role))
}
