//! Navigable address codec.
//!
//! The address is the shareable, bookmarkable form of the selection: an
//! ordered list of query parameters. Three parameter groups carry a
//! selection (`pin`; `layer`+`id`; `lat`+`lng`) and are mutually exclusive
//! in any address this module writes. Every other parameter (the `type`
//! content filter among them) is orthogonal and preserved verbatim across
//! selection changes.

use crate::selection::SelectionIntent;
use plat_api::{BoundaryLayer, LatLng, PinId};
use std::fmt;
use url::form_urlencoded;

/// Query parameter keys that carry the selection.
const SELECTION_KEYS: [&str; 5] = ["pin", "layer", "id", "lat", "lng"];

/// Ordered key-value query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigableAddress {
    params: Vec<(String, String)>,
}

impl NavigableAddress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (without the leading `?`).
    ///
    /// Percent-encoding is decoded here and re-applied by [`encode`];
    /// parameter order is preserved. Repeated keys keep the first value,
    /// matching how the platform's routers read queries.
    ///
    /// [`encode`]: NavigableAddress::encode
    pub fn parse(query: &str) -> Self {
        let mut params: Vec<(String, String)> = Vec::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if params.iter().any(|(k, _)| *k == key) {
                tracing::warn!(key = %key, "duplicate address parameter dropped");
                continue;
            }
            params.push((key.into_owned(), value.into_owned()));
        }
        Self { params }
    }

    /// Encode back to a query string (without the leading `?`).
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// First value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in order, for hosts that sync to their own router.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Decode the selection carried by this address.
    ///
    /// Writers keep the selection groups mutually exclusive, but addresses
    /// also arrive hand-edited; when several groups are present the
    /// precedence is `pin` over `layer`+`id` over `lat`+`lng`. A `layer`
    /// value outside the closed layer set disqualifies its group.
    pub fn decode_selection(&self) -> SelectionIntent {
        if let Some(pin) = self.get("pin") {
            return SelectionIntent::Pin {
                id: PinId::new(pin),
                inline: None,
            };
        }

        if let (Some(layer), Some(id)) = (self.get("layer"), self.get("id")) {
            match BoundaryLayer::from_slug(layer) {
                Some(layer) => {
                    return SelectionIntent::Boundary {
                        layer,
                        entity_id: id.to_string(),
                    }
                },
                None => {
                    tracing::warn!(layer, "unknown boundary layer in address");
                },
            }
        }

        if let (Some(lat), Some(lng)) = (self.get("lat"), self.get("lng")) {
            return SelectionIntent::Coordinate {
                location: LatLng::new(parse_coordinate("lat", lat), parse_coordinate("lng", lng)),
                meta: None,
            };
        }

        SelectionIntent::None
    }

    /// Produce the address for `intent`, carrying over every non-selection
    /// parameter of `self` unchanged and in order.
    ///
    /// All three selection groups are cleared before the new one is
    /// written, so the mutual-exclusivity invariant holds for any input
    /// address, including malformed ones.
    pub fn apply_intent(&self, intent: &SelectionIntent) -> NavigableAddress {
        let mut params: Vec<(String, String)> = Vec::new();

        match intent {
            SelectionIntent::None => {},
            SelectionIntent::Pin { id, .. } => {
                params.push(("pin".to_string(), id.as_str().to_string()));
            },
            SelectionIntent::Boundary { layer, entity_id } => {
                params.push(("layer".to_string(), layer.as_str().to_string()));
                params.push(("id".to_string(), entity_id.clone()));
            },
            SelectionIntent::Coordinate { location, .. } => {
                params.push(("lat".to_string(), location.lat.to_string()));
                params.push(("lng".to_string(), location.lng.to_string()));
            },
        }

        params.extend(
            self.params
                .iter()
                .filter(|(key, _)| !SELECTION_KEYS.contains(&key.as_str()))
                .cloned(),
        );

        NavigableAddress { params }
    }
}

impl fmt::Display for NavigableAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Parse one coordinate component defensively.
///
/// Malformed or non-finite values come from hand-edited addresses; they
/// are replaced with `0.0` rather than surfaced as errors.
fn parse_coordinate(key: &str, raw: &str) -> f64 {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            tracing::warn!(key, raw, "invalid coordinate in address, using 0");
            0.0
        },
    }
}
