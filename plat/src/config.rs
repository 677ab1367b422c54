//! Engine configuration.

use crate::geo::GeoBounds;
use serde::{Deserialize, Serialize};

/// Static settings the host supplies at engine construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Service region for empty-map clicks. Clicks outside it are ignored.
    pub region: GeoBounds,
}
