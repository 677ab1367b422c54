//! Selection and access-control engine for a collaborative civic map.
//!
//! The engine owns one mutually-exclusive selection (a pin, a boundary
//! entity, or a raw coordinate), keeps it synchronized with a shareable
//! navigable address, resolves detail data through a deduplicating cache,
//! and decides per action whether the acting user may collaborate on the
//! map. Rendering, forms, and billing UI live in the host application; the
//! engine talks to the platform only through
//! [`plat_api::MapBackend`].
//!
//! # Architecture
//!
//! ```text
//! ClickContext ──ClickRouter──▶ SelectionIntent
//!                                    │
//! NavigableAddress ◀──codec──▶ SelectionEngine ──ResultCache──▶ MapBackend
//!                                    │
//!                              ResolvedSelection / AccessDecision
//! ```
//!
//! [`SelectionEngine`] is the stateful facade; everything below it
//! ([`ClickRouter`], the address codec, [`resolve_role`], [`evaluate`]) is
//! pure and separately testable.

pub mod address;
pub mod cache;
pub mod click;
pub mod config;
pub mod engine;
pub mod events;
pub mod geo;
pub mod policy;
pub mod role;
pub mod selection;
pub mod session;

pub use address::NavigableAddress;
pub use cache::ResultCache;
pub use click::{ClickContext, ClickRouter, MapFeature};
pub use config::EngineConfig;
pub use engine::SelectionEngine;
pub use events::AccessDenied;
pub use geo::GeoBounds;
pub use policy::{evaluate, AccessDecision, CollabAction, DenyReason};
pub use role::{resolve_role, RoleFlags, ViewAsRole};
pub use selection::{ResolutionPhase, ResolvedSelection, SelectionIntent};
pub use session::{SessionState, SessionStore};
