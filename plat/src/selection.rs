//! Selection model.
//!
//! A map session has exactly one active selection at a time: a pin, a
//! boundary entity, a raw coordinate, or nothing. [`SelectionIntent`] is the
//! identity the user asked for; [`ResolvedSelection`] is the materialized
//! view the host renders, which may still be loading detail data.

use plat_api::{BoundaryDetail, BoundaryLayer, LatLng, PinId, PinSummary};
use serde::{Deserialize, Serialize};

/// What the user selected. Applying a new intent always replaces the old
/// one whole; variants never stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SelectionIntent {
    None,
    Pin {
        id: PinId,
        /// Partial summary carried by the clicked marker, shown while the
        /// full summary is fetched. Never part of the intent's identity.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inline: Option<PinSummary>,
    },
    Boundary {
        layer: BoundaryLayer,
        entity_id: String,
    },
    Coordinate {
        location: LatLng,
        /// Opaque map-view metadata the renderer attached to the click,
        /// passed through for display. Never part of the intent's identity.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<serde_json::Value>,
    },
}

impl SelectionIntent {
    pub fn pin(id: impl Into<PinId>) -> Self {
        SelectionIntent::Pin {
            id: id.into(),
            inline: None,
        }
    }

    pub fn boundary(layer: BoundaryLayer, entity_id: impl Into<String>) -> Self {
        SelectionIntent::Boundary {
            layer,
            entity_id: entity_id.into(),
        }
    }

    pub fn coordinate(location: LatLng) -> Self {
        SelectionIntent::Coordinate {
            location,
            meta: None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SelectionIntent::None)
    }

    /// Whether two intents address the same target, ignoring display-only
    /// payloads (inline pin data, click metadata).
    pub fn same_target(&self, other: &SelectionIntent) -> bool {
        match (self, other) {
            (SelectionIntent::None, SelectionIntent::None) => true,
            (SelectionIntent::Pin { id: a, .. }, SelectionIntent::Pin { id: b, .. }) => a == b,
            (
                SelectionIntent::Boundary {
                    layer: al,
                    entity_id: ae,
                },
                SelectionIntent::Boundary {
                    layer: bl,
                    entity_id: be,
                },
            ) => al == bl && ae == be,
            (
                SelectionIntent::Coordinate { location: a, .. },
                SelectionIntent::Coordinate { location: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// Resolution progress for the active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPhase {
    /// Detail fetch is in flight; identity (and any inline data) is usable.
    Resolving,
    /// Detail fetch finished. Absent detail means not found or fetch
    /// failure; the selection stays open either way.
    Resolved,
}

/// The materialized selection the host renders.
///
/// Identity fields are always present; detail payloads arrive when the
/// resolution completes. A coordinate's geocoded address may fill in after
/// the selection is already visible without changing its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolvedSelection {
    None,
    Pin {
        id: PinId,
        summary: Option<PinSummary>,
        phase: ResolutionPhase,
    },
    Boundary {
        layer: BoundaryLayer,
        entity_id: String,
        detail: Option<BoundaryDetail>,
        phase: ResolutionPhase,
    },
    Coordinate {
        location: LatLng,
        address: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<serde_json::Value>,
        phase: ResolutionPhase,
    },
}

impl ResolvedSelection {
    /// Initial view for a freshly applied intent.
    ///
    /// A pin click's inline summary is displayed immediately while the full
    /// fetch proceeds.
    pub fn resolving_for(intent: &SelectionIntent) -> Self {
        match intent {
            SelectionIntent::None => ResolvedSelection::None,
            SelectionIntent::Pin { id, inline } => ResolvedSelection::Pin {
                id: id.clone(),
                summary: inline.clone(),
                phase: ResolutionPhase::Resolving,
            },
            SelectionIntent::Boundary { layer, entity_id } => ResolvedSelection::Boundary {
                layer: *layer,
                entity_id: entity_id.clone(),
                detail: None,
                phase: ResolutionPhase::Resolving,
            },
            SelectionIntent::Coordinate { location, meta } => ResolvedSelection::Coordinate {
                location: *location,
                address: None,
                meta: meta.clone(),
                phase: ResolutionPhase::Resolving,
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ResolvedSelection::None)
    }

    pub fn phase(&self) -> Option<ResolutionPhase> {
        match self {
            ResolvedSelection::None => None,
            ResolvedSelection::Pin { phase, .. }
            | ResolvedSelection::Boundary { phase, .. }
            | ResolvedSelection::Coordinate { phase, .. } => Some(*phase),
        }
    }
}
