//! Click routing.
//!
//! Turns a raw map click into a selection intent. The renderer hit-tests
//! the pointer against its interactive layers (within its own tie-break
//! radius) and hands the engine the features it found, in render order.

use crate::{geo::GeoBounds, selection::SelectionIntent};
use plat_api::{BoundaryLayer, LatLng, PinId, PinSummary};
use smallvec::SmallVec;

/// One feature the renderer found under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum MapFeature {
    /// A pin marker. Markers usually embed a partial summary for instant
    /// display.
    Pin {
        id: PinId,
        summary: Option<PinSummary>,
    },
    /// A user-drawn area post. Areas select like pins, by post id.
    Area { id: PinId },
    /// A feature on one of the administrative boundary layers.
    Boundary {
        layer: BoundaryLayer,
        entity_id: String,
    },
}

/// A raw click: where it landed and what was under the pointer.
///
/// `features` is in render order, bottom to top; the last entry is the
/// topmost feature.
#[derive(Debug, Clone)]
pub struct ClickContext {
    pub location: LatLng,
    pub features: SmallVec<[MapFeature; 4]>,
    /// Opaque map-view metadata from the renderer, carried through to a
    /// coordinate selection for display.
    pub meta: Option<serde_json::Value>,
}

impl ClickContext {
    /// A click that hit nothing interactive.
    pub fn empty(location: LatLng) -> Self {
        Self {
            location,
            features: SmallVec::new(),
            meta: None,
        }
    }

    pub fn with_feature(mut self, feature: MapFeature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Routes clicks to selection intents.
pub struct ClickRouter {
    region: GeoBounds,
}

impl ClickRouter {
    pub fn new(region: GeoBounds) -> Self {
        Self { region }
    }

    /// Decide what the click selects.
    ///
    /// Pins and areas beat boundary features regardless of stacking order;
    /// within each kind the topmost feature wins. A click that hits nothing
    /// selects the bare coordinate, but only inside the service region --
    /// out-of-region clicks are ignored outright and return `None`.
    pub fn route(&self, context: &ClickContext) -> Option<SelectionIntent> {
        for feature in context.features.iter().rev() {
            match feature {
                MapFeature::Pin { id, summary } => {
                    return Some(SelectionIntent::Pin {
                        id: id.clone(),
                        inline: summary.clone(),
                    });
                },
                MapFeature::Area { id } => {
                    return Some(SelectionIntent::Pin {
                        id: id.clone(),
                        inline: None,
                    });
                },
                MapFeature::Boundary { .. } => {},
            }
        }

        for feature in context.features.iter().rev() {
            if let MapFeature::Boundary { layer, entity_id } = feature {
                return Some(SelectionIntent::Boundary {
                    layer: *layer,
                    entity_id: entity_id.clone(),
                });
            }
        }

        if self.region.contains(context.location) {
            Some(SelectionIntent::Coordinate {
                location: context.location,
                meta: context.meta.clone(),
            })
        } else {
            tracing::debug!(
                lat = context.location.lat,
                lng = context.location.lng,
                "click outside service region ignored"
            );
            None
        }
    }
}
