//! The selection engine.
//!
//! [`SelectionEngine`] owns the current selection, its resolved detail, the
//! canonical navigable address, and the access-check path. Hosts feed it
//! clicks and addresses, subscribe to its channels, and render whatever the
//! latest event says.
//!
//! The engine spawns nothing. Every entry point runs on the caller's task;
//! all shared state sits behind one mutex that is never held across an
//! await. Superseded resolutions are not cancelled, they are discarded at
//! the end by generation comparison, and the caches keep whatever they
//! fetched for the next visit.

use crate::{
    address::NavigableAddress,
    cache::ResultCache,
    click::{ClickContext, ClickRouter},
    config::EngineConfig,
    events::AccessDenied,
    policy::{evaluate, AccessDecision, CollabAction, DenyReason},
    role::{resolve_role, ViewAsRole},
    selection::{ResolutionPhase, ResolvedSelection, SelectionIntent},
    session::SessionState,
};
use async_channel::{Receiver, Sender};
use parking_lot::Mutex;
use plat_api::{
    AccountId, Actor, BoundaryDetail, BoundaryLayer, Hydration, LatLng, MapBackend, MapConfig,
    MembershipRecord, PinId, PinSummary, PlanFeatureSet, PlanLevel,
};
use std::sync::Arc;
use uuid::Uuid;

/// Coordinates selection, address sync, resolution, and access checks for
/// one map view.
pub struct SelectionEngine {
    inner: Arc<Mutex<EngineInner>>,
    backend: Arc<dyn MapBackend>,
    map: MapConfig,
    actor: Actor,
    router: ClickRouter,
    pins: ResultCache<PinSummary>,
    boundaries: ResultCache<BoundaryDetail>,
    geocodes: ResultCache<String>,
    memberships: ResultCache<MembershipRecord>,
    plans: ResultCache<PlanFeatureSet>,
}

struct EngineInner {
    /// What the user asked to select.
    intent: SelectionIntent,

    /// What the UI should render for it.
    resolved: ResolvedSelection,

    /// Canonical shareable address for the current state.
    address: NavigableAddress,

    /// Monotonic id of the current selection. A resolution that completes
    /// carrying an older generation is stale and gets dropped.
    generation: u64,

    /// Owner's preview override.
    view_as: ViewAsRole,

    /// Stable id for this session, surfaced through [`SessionState`].
    session_id: Uuid,

    selection_subscribers: Vec<Sender<ResolvedSelection>>,
    address_subscribers: Vec<Sender<NavigableAddress>>,
    denied_subscribers: Vec<Sender<AccessDenied>>,
}

impl SelectionEngine {
    pub fn new(
        backend: Arc<dyn MapBackend>,
        map: MapConfig,
        actor: Actor,
        config: EngineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                intent: SelectionIntent::None,
                resolved: ResolvedSelection::None,
                address: NavigableAddress::new(),
                generation: 0,
                view_as: ViewAsRole::default(),
                session_id: Uuid::new_v4(),
                selection_subscribers: Vec::new(),
                address_subscribers: Vec::new(),
                denied_subscribers: Vec::new(),
            })),
            backend,
            map,
            actor,
            router: ClickRouter::new(config.region),
            pins: ResultCache::new(),
            boundaries: ResultCache::new(),
            geocodes: ResultCache::new(),
            memberships: ResultCache::new(),
            plans: ResultCache::new(),
        }
    }

    /// Subscribe to resolved-selection updates.
    ///
    /// The engine sends the `Resolving` view as soon as an intent is
    /// applied and the `Resolved` view when its fetches complete, so a
    /// renderer can just draw the latest message it received.
    pub fn subscribe_selection(&self) -> Receiver<ResolvedSelection> {
        let (tx, rx) = async_channel::unbounded();
        self.inner.lock().selection_subscribers.push(tx);
        rx
    }

    /// Subscribe to canonical-address changes, for URL sync.
    pub fn subscribe_address(&self) -> Receiver<NavigableAddress> {
        let (tx, rx) = async_channel::unbounded();
        self.inner.lock().address_subscribers.push(tx);
        rx
    }

    /// Subscribe to plan-gated denial events, for upgrade prompts.
    pub fn subscribe_access_denied(&self) -> Receiver<AccessDenied> {
        let (tx, rx) = async_channel::unbounded();
        self.inner.lock().denied_subscribers.push(tx);
        rx
    }

    /// Route a map click and select whatever it hit.
    ///
    /// Returns the intent the click produced, or `None` for an ignored
    /// out-of-region click (no state changes, nothing emitted).
    pub async fn select_from_click(&self, context: ClickContext) -> Option<SelectionIntent> {
        let intent = self.router.route(&context)?;
        let generation = self.apply(intent.clone(), None);
        self.resolve(generation, &intent).await;
        Some(intent)
    }

    /// Adopt the selection encoded in an externally supplied address.
    ///
    /// Used at startup and whenever the host observes navigation it did not
    /// initiate. The address is canonicalized on the way in: selection keys
    /// are rewritten in canonical order and unrelated parameters survive
    /// verbatim.
    pub async fn select_from_address(&self, address: &NavigableAddress) {
        let intent = address.decode_selection();
        let generation = self.apply(intent.clone(), Some(address));
        self.resolve(generation, &intent).await;
    }

    /// Drop the current selection.
    ///
    /// Bumps the generation, so an in-flight resolution for the old
    /// selection is discarded when it completes.
    pub fn clear_selection(&self) {
        self.apply(SelectionIntent::None, None);
    }

    /// Check whether the acting user may perform `action`, and tell the
    /// denial subscribers when the answer is an upgradeable no.
    pub async fn request_action(&self, action: CollabAction) -> AccessDecision {
        let plan = self.actor.effective_plan();
        let view_as = self.inner.lock().view_as;
        let acting = &self.actor.account_id;
        let owner = &self.map.owner_account_id;

        let flags = if acting == owner {
            // The override replaces the owner's own record wholesale; no
            // lookup needed.
            resolve_role(None, acting, owner, view_as)
        } else {
            let membership = self.fetch_membership(acting).await;
            resolve_role(membership.as_ref(), acting, owner, view_as)
        };

        let decision = evaluate(action, &self.map, plan, flags);
        if decision.reason == Some(DenyReason::PlanRequired) {
            self.emit_denied(AccessDenied {
                action,
                reason: DenyReason::PlanRequired,
                required_plan: decision.required_plan,
                current_plan: decision.current_plan,
            });
        }
        decision
    }

    /// Entitlements for a plan tier, memoized for upgrade prompts.
    pub async fn plan_limits(&self, level: PlanLevel) -> Option<PlanFeatureSet> {
        let backend = self.backend.clone();
        self.plans
            .resolve(level.as_str(), move || async move {
                match backend.fetch_plan_limits(level).await {
                    Ok(limits) => limits,
                    Err(error) => {
                        tracing::warn!(plan = %level, %error, "plan limits fetch failed");
                        None
                    },
                }
            })
            .await
    }

    pub fn resolved_selection(&self) -> ResolvedSelection {
        self.inner.lock().resolved.clone()
    }

    pub fn current_intent(&self) -> SelectionIntent {
        self.inner.lock().intent.clone()
    }

    pub fn current_address(&self) -> NavigableAddress {
        self.inner.lock().address.clone()
    }

    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn view_as(&self) -> ViewAsRole {
        self.inner.lock().view_as
    }

    /// Set the owner's preview override. Ignored with a warning for anyone
    /// who is not the map owner.
    pub fn set_view_as(&self, view_as: ViewAsRole) {
        if self.actor.account_id != self.map.owner_account_id {
            tracing::warn!(
                account = %self.actor.account_id,
                "view-as override ignored for non-owner"
            );
            return;
        }
        self.inner.lock().view_as = view_as;
    }

    /// Snapshot the persistable slice of engine state.
    pub fn session_state(&self) -> SessionState {
        let inner = self.inner.lock();
        SessionState {
            id: inner.session_id,
            view_as: inner.view_as,
        }
    }

    /// Adopt a previously stored session.
    ///
    /// The stored view-as override only applies when the acting user owns
    /// the map; a stale override from another map or account is dropped.
    pub fn restore_session(&self, state: SessionState) {
        let mut inner = self.inner.lock();
        inner.session_id = state.id;
        if self.actor.account_id == self.map.owner_account_id {
            inner.view_as = state.view_as;
        } else if state.view_as != ViewAsRole::default() {
            tracing::warn!("stored view-as override ignored for non-owner");
        }
    }

    /// Drop every cached resolution. For map-context switches, where entity
    /// ids from the old map must not leak into the new one.
    pub fn clear_caches(&self) {
        self.pins.clear();
        self.boundaries.clear();
        self.geocodes.clear();
        self.memberships.clear();
        self.plans.clear();
    }

    /// Install `intent` as the current selection, sync the address, and
    /// announce the `Resolving` view. Returns the generation assigned to
    /// this selection.
    ///
    /// `base` is the address to rewrite; `None` means the engine's own.
    fn apply(&self, intent: SelectionIntent, base: Option<&NavigableAddress>) -> u64 {
        let resolving = ResolvedSelection::resolving_for(&intent);

        let (generation, resolved, address, selection_subs, address_subs) = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            let generation = inner.generation;

            let next_address = base.unwrap_or(&inner.address).apply_intent(&intent);
            let address_changed = next_address != inner.address;

            inner.intent = intent;
            inner.resolved = resolving;
            inner.address = next_address;

            inner.selection_subscribers.retain(|tx| !tx.is_closed());
            inner.address_subscribers.retain(|tx| !tx.is_closed());
            (
                generation,
                inner.resolved.clone(),
                address_changed.then(|| inner.address.clone()),
                inner.selection_subscribers.clone(),
                inner.address_subscribers.clone(),
            )
        };

        for tx in selection_subs {
            let _ = tx.try_send(resolved.clone());
        }
        if let Some(address) = address {
            for tx in address_subs {
                let _ = tx.try_send(address.clone());
            }
        }
        generation
    }

    /// Resolve `intent` against the backend and file the result under
    /// `generation`.
    ///
    /// Runs to completion even if the selection has moved on underneath;
    /// [`Self::finish`] drops the result in that case and the cache keeps
    /// the fetched value for the next visit.
    async fn resolve(&self, generation: u64, intent: &SelectionIntent) {
        match intent {
            SelectionIntent::None => {},
            SelectionIntent::Pin { id, inline } => {
                let summary = self.fetch_pin_summary(id).await.or_else(|| inline.clone());
                self.finish(
                    generation,
                    ResolvedSelection::Pin {
                        id: id.clone(),
                        summary,
                        phase: ResolutionPhase::Resolved,
                    },
                );
            },
            SelectionIntent::Boundary { layer, entity_id } => {
                let detail = self.fetch_boundary(*layer, entity_id).await;
                self.finish(
                    generation,
                    ResolvedSelection::Boundary {
                        layer: *layer,
                        entity_id: entity_id.clone(),
                        detail,
                        phase: ResolutionPhase::Resolved,
                    },
                );
            },
            SelectionIntent::Coordinate { location, meta } => {
                let label = self.fetch_geocode(*location).await;
                self.finish(
                    generation,
                    ResolvedSelection::Coordinate {
                        location: *location,
                        address: label,
                        meta: meta.clone(),
                        phase: ResolutionPhase::Resolved,
                    },
                );
            },
        }
    }

    /// Apply a completed resolution, unless the selection has changed since
    /// it started.
    fn finish(&self, generation: u64, resolved: ResolvedSelection) {
        let subscribers = {
            let mut inner = self.inner.lock();
            if inner.generation != generation {
                tracing::debug!(
                    stale = generation,
                    current = inner.generation,
                    "dropping stale resolution"
                );
                return;
            }
            inner.resolved = resolved.clone();
            inner.selection_subscribers.retain(|tx| !tx.is_closed());
            inner.selection_subscribers.clone()
        };

        for tx in subscribers {
            let _ = tx.try_send(resolved.clone());
        }
    }

    async fn fetch_pin_summary(&self, id: &PinId) -> Option<PinSummary> {
        let backend = self.backend.clone();
        let fetch_id = id.clone();
        let summary = self
            .pins
            .resolve(id.as_str(), move || async move {
                match backend.fetch_pin(&fetch_id).await {
                    Ok(summary) => summary,
                    Err(error) => {
                        tracing::warn!(pin = %fetch_id, %error, "pin fetch failed");
                        None
                    },
                }
            })
            .await;

        // Tile embeds are partial; only a fully hydrated summary is worth
        // keeping for future visits.
        if let Some(summary) = &summary {
            if summary.hydration() == Hydration::Partial {
                self.pins.invalidate(id.as_str());
            }
        }
        summary
    }

    async fn fetch_boundary(&self, layer: BoundaryLayer, entity_id: &str) -> Option<BoundaryDetail> {
        let backend = self.backend.clone();
        let key = format!("{}/{entity_id}", layer.as_str());
        let fetch_entity = entity_id.to_string();
        self.boundaries
            .resolve(&key, move || async move {
                match backend.resolve_boundary(layer, &fetch_entity).await {
                    Ok(detail) => detail,
                    Err(error) => {
                        tracing::warn!(
                            layer = %layer,
                            entity = %fetch_entity,
                            %error,
                            "boundary fetch failed"
                        );
                        None
                    },
                }
            })
            .await
    }

    async fn fetch_geocode(&self, location: LatLng) -> Option<String> {
        let backend = self.backend.clone();
        self.geocodes
            .resolve(&location.to_string(), move || async move {
                match backend.reverse_geocode(location).await {
                    Ok(label) => label,
                    Err(error) => {
                        tracing::warn!(
                            lat = location.lat,
                            lng = location.lng,
                            %error,
                            "reverse geocode failed"
                        );
                        None
                    },
                }
            })
            .await
    }

    async fn fetch_membership(&self, account: &AccountId) -> Option<MembershipRecord> {
        let backend = self.backend.clone();
        let map_id = self.map.id.clone();
        let fetch_account = account.clone();
        self.memberships
            .resolve(account.as_str(), move || async move {
                match backend.fetch_membership(&map_id, &fetch_account).await {
                    Ok(record) => record,
                    Err(error) => {
                        tracing::warn!(
                            account = %fetch_account,
                            %error,
                            "membership fetch failed"
                        );
                        None
                    },
                }
            })
            .await
    }

    fn emit_denied(&self, event: AccessDenied) {
        let subscribers = {
            let mut inner = self.inner.lock();
            inner.denied_subscribers.retain(|tx| !tx.is_closed());
            inner.denied_subscribers.clone()
        };

        for tx in subscribers {
            let _ = tx.try_send(event.clone());
        }
    }
}
