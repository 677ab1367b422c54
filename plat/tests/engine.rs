//! Engine-level tests against the mock backend.
//!
//! Exercises the full click-to-resolution and address-sync paths, cache
//! behavior across reselection, stale-resolution handling under a held
//! backend, and the access-check path with its denial events.

use chrono::Utc;
use plat::{
    AccessDecision, ClickContext, CollabAction, DenyReason, EngineConfig, MapFeature,
    NavigableAddress, ResolutionPhase, ResolvedSelection, SelectionEngine, SelectionIntent,
    SessionState, ViewAsRole,
};
use plat_api::{
    test::MockBackend, AccountId, Actor, BoundaryDetail, BoundaryLayer, Hydration, LatLng,
    MapConfig, MapId, MapVisibility, MembershipRecord, MembershipRole, PinAccount, PinId,
    PinSummary, PlanFeatureSet, PlanLevel,
};
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

fn minneapolis() -> LatLng {
    LatLng::new(44.9778, -93.265)
}

fn full_pin(id: &str) -> PinSummary {
    PinSummary {
        id: PinId::from(id),
        location: minneapolis(),
        emoji: Some("🌮".to_string()),
        caption: Some("late night tacos".to_string()),
        image_url: None,
        video_url: None,
        account: Some(PinAccount {
            id: AccountId::from("acct-author"),
            username: "mabel".to_string(),
            image_url: Some("https://cdn.example/mabel.png".to_string()),
        }),
    }
}

fn partial_pin(id: &str) -> PinSummary {
    PinSummary {
        id: PinId::from(id),
        location: minneapolis(),
        emoji: Some("🌮".to_string()),
        caption: None,
        image_url: None,
        video_url: None,
        account: None,
    }
}

fn county(entity_id: &str, name: &str) -> BoundaryDetail {
    BoundaryDetail {
        layer: BoundaryLayer::County,
        entity_id: entity_id.to_string(),
        name: name.to_string(),
        location: None,
        properties: serde_json::Value::Null,
    }
}

fn open_map() -> MapConfig {
    MapConfig {
        id: MapId::from("map-mn"),
        owner_account_id: AccountId::from("acct-owner"),
        ..MapConfig::default()
    }
}

fn visitor() -> Actor {
    Actor::new("acct-visitor", PlanLevel::Hobby)
}

fn engine_with(mock: &MockBackend, map: MapConfig, actor: Actor) -> SelectionEngine {
    SelectionEngine::new(Arc::new(mock.clone()), map, actor, EngineConfig::default())
}

fn pin_click(id: &str, summary: Option<PinSummary>) -> ClickContext {
    ClickContext::empty(minneapolis()).with_feature(MapFeature::Pin {
        id: PinId::from(id),
        summary,
    })
}

async fn recv<T>(rx: &async_channel::Receiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("event arrives before timeout")
        .expect("channel open")
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition holds before timeout");
}

#[tokio::test]
async fn pin_click_resolves_to_full_summary() {
    let mock = MockBackend::new().with_pin(full_pin("p1"));
    let engine = engine_with(&mock, open_map(), visitor());

    let intent = engine.select_from_click(pin_click("p1", None)).await;
    assert_eq!(intent, Some(SelectionIntent::pin("p1")));

    match engine.resolved_selection() {
        ResolvedSelection::Pin { id, summary, phase } => {
            assert_eq!(id, PinId::from("p1"));
            assert_eq!(phase, ResolutionPhase::Resolved);
            let summary = summary.expect("summary fetched");
            assert_eq!(summary.hydration(), Hydration::Full);
            assert_eq!(summary.caption.as_deref(), Some("late night tacos"));
        },
        other => panic!("expected pin selection, got {other:?}"),
    }
    assert_eq!(engine.current_address().encode(), "pin=p1");
}

#[tokio::test]
async fn click_preserves_content_filter_in_address() {
    let mock = MockBackend::new().with_pin(full_pin("p1"));
    let engine = engine_with(&mock, open_map(), visitor());

    engine
        .select_from_address(&NavigableAddress::parse("lat=44.9&lng=-93.2&type=food"))
        .await;
    assert_eq!(
        engine.current_address().encode(),
        "lat=44.9&lng=-93.2&type=food"
    );

    // Selecting a pin drops the coordinate group but keeps the filter.
    engine.select_from_click(pin_click("p1", None)).await;
    assert_eq!(engine.current_address().encode(), "pin=p1&type=food");
}

#[tokio::test]
async fn transitions_keep_selection_groups_exclusive() {
    let mock = MockBackend::new()
        .with_pin(full_pin("p1"))
        .with_boundary(county("27053", "Hennepin County"));
    let engine = engine_with(&mock, open_map(), visitor());

    engine
        .select_from_address(&NavigableAddress::parse("pin=p1&type=food"))
        .await;
    engine
        .select_from_address(&NavigableAddress::parse("layer=county&id=27053&type=food"))
        .await;

    let address = engine.current_address();
    assert_eq!(address.encode(), "layer=county&id=27053&type=food");
    assert_eq!(address.get("pin"), None);
    assert_eq!(
        engine.current_intent(),
        SelectionIntent::boundary(BoundaryLayer::County, "27053")
    );

    engine.clear_selection();
    assert_eq!(engine.current_address().encode(), "type=food");
    assert!(engine.current_intent().is_none());
    assert!(engine.resolved_selection().is_none());
}

#[tokio::test]
async fn address_subscribers_see_canonical_rewrites() {
    let mock = MockBackend::new()
        .with_pin(full_pin("p1"))
        .with_boundary(county("27053", "Hennepin County"));
    let engine = engine_with(&mock, open_map(), visitor());
    let addresses = engine.subscribe_address();

    // Hand-edited parameter order comes back out canonical.
    engine
        .select_from_address(&NavigableAddress::parse("id=27053&layer=county&zoom=12"))
        .await;
    assert_eq!(recv(&addresses).await.encode(), "layer=county&id=27053&zoom=12");

    engine.select_from_click(pin_click("p1", None)).await;
    assert_eq!(recv(&addresses).await.encode(), "pin=p1&zoom=12");

    // Reselecting the same pin leaves the address alone, so the next event
    // is the clear.
    engine.select_from_click(pin_click("p1", None)).await;
    engine.clear_selection();
    assert_eq!(recv(&addresses).await.encode(), "zoom=12");
}

#[tokio::test]
async fn repeat_selection_hits_the_cache() {
    let mock = MockBackend::new()
        .with_pin(full_pin("p1"))
        .with_boundary(county("27053", "Hennepin County"));
    let engine = engine_with(&mock, open_map(), visitor());
    let boundary = NavigableAddress::parse("layer=county&id=27053");

    engine.select_from_click(pin_click("p1", None)).await;
    engine.select_from_address(&boundary).await;
    engine.select_from_click(pin_click("p1", None)).await;
    engine.select_from_address(&boundary).await;

    assert_eq!(mock.pin_fetches(&PinId::from("p1")), 1);
    assert_eq!(mock.boundary_fetches(BoundaryLayer::County, "27053"), 1);
}

#[tokio::test]
async fn rapid_switching_keeps_the_last_intent() {
    let mock = MockBackend::new()
        .with_pin(full_pin("p1"))
        .with_boundary(county("27053", "Hennepin County"));
    let engine = Arc::new(engine_with(&mock, open_map(), visitor()));
    let hold = mock.hold();

    let pin_task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.select_from_click(pin_click("p1", None)).await })
    };
    wait_until(|| mock.pin_fetches(&PinId::from("p1")) == 1).await;

    let boundary_task = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .select_from_address(&NavigableAddress::parse("layer=county&id=27053"))
                .await;
        })
    };
    wait_until(|| mock.boundary_fetches(BoundaryLayer::County, "27053") == 1).await;

    hold.release();
    pin_task.await.expect("pin task joins");
    boundary_task.await.expect("boundary task joins");

    // The pin resolution finished under a superseded generation and was
    // dropped; the boundary selection won.
    match engine.resolved_selection() {
        ResolvedSelection::Boundary {
            entity_id,
            detail,
            phase,
            ..
        } => {
            assert_eq!(entity_id, "27053");
            assert_eq!(phase, ResolutionPhase::Resolved);
            assert_eq!(detail.expect("boundary resolved").name, "Hennepin County");
        },
        other => panic!("expected boundary selection, got {other:?}"),
    }
    assert_eq!(engine.current_address().encode(), "layer=county&id=27053");
}

#[tokio::test]
async fn clearing_drops_the_inflight_resolution() {
    let mock = MockBackend::new().with_pin(full_pin("p1"));
    let engine = Arc::new(engine_with(&mock, open_map(), visitor()));
    let hold = mock.hold();

    let task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.select_from_click(pin_click("p1", None)).await })
    };
    wait_until(|| mock.pin_fetches(&PinId::from("p1")) == 1).await;

    engine.clear_selection();
    hold.release();
    task.await.expect("select joins");

    assert!(engine.resolved_selection().is_none());
    assert!(engine.current_address().is_empty());

    // The dropped resolution still populated the cache.
    engine.select_from_click(pin_click("p1", None)).await;
    assert_eq!(mock.pin_fetches(&PinId::from("p1")), 1);
}

#[tokio::test]
async fn inline_summary_shows_while_full_fetch_runs() {
    let mock = MockBackend::new().with_pin(full_pin("p1"));
    let engine = Arc::new(engine_with(&mock, open_map(), visitor()));
    let selections = engine.subscribe_selection();
    let hold = mock.hold();

    let task = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .select_from_click(pin_click("p1", Some(partial_pin("p1"))))
                .await
        })
    };

    match recv(&selections).await {
        ResolvedSelection::Pin { summary, phase, .. } => {
            assert_eq!(phase, ResolutionPhase::Resolving);
            let summary = summary.expect("inline summary shown immediately");
            assert_eq!(summary.hydration(), Hydration::Partial);
        },
        other => panic!("expected pin selection, got {other:?}"),
    }

    hold.release();
    task.await.expect("select joins");

    match recv(&selections).await {
        ResolvedSelection::Pin { summary, phase, .. } => {
            assert_eq!(phase, ResolutionPhase::Resolved);
            assert_eq!(summary.expect("full summary").hydration(), Hydration::Full);
        },
        other => panic!("expected pin selection, got {other:?}"),
    }
}

#[tokio::test]
async fn partial_fetch_results_are_not_cached() {
    let mock = MockBackend::new().with_pin(partial_pin("p2"));
    let engine = engine_with(&mock, open_map(), visitor());

    engine.select_from_click(pin_click("p2", None)).await;
    match engine.resolved_selection() {
        ResolvedSelection::Pin { summary, .. } => {
            let summary = summary.expect("partial summary still displayed");
            assert_eq!(summary.hydration(), Hydration::Partial);
        },
        other => panic!("expected pin selection, got {other:?}"),
    }

    engine.select_from_click(pin_click("p2", None)).await;
    assert_eq!(mock.pin_fetches(&PinId::from("p2")), 2);
}

#[tokio::test]
async fn failed_fetches_are_retried_on_reselection() {
    let mock = MockBackend::new().with_boundary(county("27053", "Hennepin County"));
    mock.fail_boundary(BoundaryLayer::County, "27053", 2);
    let engine = engine_with(&mock, open_map(), visitor());
    let address = NavigableAddress::parse("layer=county&id=27053");

    engine.select_from_address(&address).await;
    match engine.resolved_selection() {
        ResolvedSelection::Boundary { detail, phase, .. } => {
            assert_eq!(phase, ResolutionPhase::Resolved);
            assert!(detail.is_none(), "failure leaves the selection open");
        },
        other => panic!("expected boundary selection, got {other:?}"),
    }

    engine.select_from_address(&address).await;
    engine.select_from_address(&address).await;

    match engine.resolved_selection() {
        ResolvedSelection::Boundary { detail, .. } => {
            assert_eq!(detail.expect("resolved on retry").name, "Hennepin County");
        },
        other => panic!("expected boundary selection, got {other:?}"),
    }
    assert_eq!(mock.boundary_fetches(BoundaryLayer::County, "27053"), 3);
}

#[tokio::test]
async fn unknown_pin_resolves_without_detail() {
    let mock = MockBackend::new();
    let engine = engine_with(&mock, open_map(), visitor());

    let intent = engine.select_from_click(pin_click("ghost", None)).await;
    assert_eq!(intent, Some(SelectionIntent::pin("ghost")));

    match engine.resolved_selection() {
        ResolvedSelection::Pin { id, summary, phase } => {
            assert_eq!(id, PinId::from("ghost"));
            assert_eq!(phase, ResolutionPhase::Resolved);
            assert!(summary.is_none());
        },
        other => panic!("expected pin selection, got {other:?}"),
    }
    assert_eq!(engine.current_address().encode(), "pin=ghost");
}

#[tokio::test]
async fn coordinate_geocode_fills_in_late() {
    let spot = minneapolis();
    let view = serde_json::json!({"zoom": 12, "basemap": "streets"});
    let mock = MockBackend::new().with_geocode(spot, "Nicollet Mall, Minneapolis");
    let engine = Arc::new(engine_with(&mock, open_map(), visitor()));
    let hold = mock.hold();

    let task = {
        let engine = engine.clone();
        let click = ClickContext::empty(spot).with_meta(view.clone());
        tokio::spawn(async move { engine.select_from_click(click).await })
    };
    wait_until(|| mock.geocode_fetches(spot) == 1).await;

    // The coordinate renders before its label arrives.
    match engine.resolved_selection() {
        ResolvedSelection::Coordinate {
            location,
            address,
            meta,
            phase,
        } => {
            assert_eq!(location, spot);
            assert!(address.is_none());
            assert_eq!(meta, Some(view.clone()));
            assert_eq!(phase, ResolutionPhase::Resolving);
        },
        other => panic!("expected coordinate selection, got {other:?}"),
    }

    hold.release();
    task.await.expect("select joins");

    match engine.resolved_selection() {
        ResolvedSelection::Coordinate {
            address,
            meta,
            phase,
            ..
        } => {
            assert_eq!(address.as_deref(), Some("Nicollet Mall, Minneapolis"));
            assert_eq!(meta, Some(view));
            assert_eq!(phase, ResolutionPhase::Resolved);
        },
        other => panic!("expected coordinate selection, got {other:?}"),
    }
    // View metadata never leaks into the shareable address.
    assert_eq!(engine.current_address().encode(), "lat=44.9778&lng=-93.265");
}

#[tokio::test]
async fn out_of_region_click_changes_nothing() {
    let mock = MockBackend::new().with_pin(full_pin("p1"));
    let engine = engine_with(&mock, open_map(), visitor());
    let selections = engine.subscribe_selection();
    let addresses = engine.subscribe_address();

    engine.select_from_click(pin_click("p1", None)).await;
    let _ = recv(&selections).await;
    let _ = recv(&selections).await;
    let _ = recv(&addresses).await;

    let chicago = LatLng::new(41.8781, -87.6298);
    let intent = engine.select_from_click(ClickContext::empty(chicago)).await;
    assert_eq!(intent, None);

    assert_eq!(engine.current_intent(), SelectionIntent::pin("p1"));
    assert_eq!(engine.current_address().encode(), "pin=p1");
    assert!(selections.try_recv().is_err());
    assert!(addresses.try_recv().is_err());
}

#[tokio::test]
async fn clearing_caches_forces_refetches() {
    let mock = MockBackend::new().with_pin(full_pin("p1"));
    let engine = engine_with(&mock, open_map(), visitor());

    engine.select_from_click(pin_click("p1", None)).await;
    engine.clear_caches();
    engine.select_from_click(pin_click("p1", None)).await;

    assert_eq!(mock.pin_fetches(&PinId::from("p1")), 2);
}

#[tokio::test]
async fn owner_bypasses_toggles_without_membership_lookup() {
    let mock = MockBackend::new();
    let map = MapConfig {
        allow_pins: false,
        ..open_map()
    };
    let engine = engine_with(&mock, map, Actor::new("acct-owner", PlanLevel::Hobby));

    let decision = engine.request_action(CollabAction::Pins).await;
    assert!(decision.allowed);
    assert_eq!(
        mock.membership_fetches(&MapId::from("map-mn"), &AccountId::from("acct-owner")),
        0
    );
}

#[tokio::test]
async fn plan_gate_denies_and_notifies() {
    let mock = MockBackend::new();
    let map = MapConfig {
        pins_required_plan: Some(PlanLevel::Contributor),
        ..open_map()
    };
    let engine = engine_with(&mock, map, visitor());
    let denials = engine.subscribe_access_denied();

    let decision = engine.request_action(CollabAction::Pins).await;
    assert_eq!(
        decision,
        AccessDecision::plan_required(PlanLevel::Contributor, PlanLevel::Hobby)
    );

    let event = recv(&denials).await;
    assert_eq!(event.action, CollabAction::Pins);
    assert_eq!(event.reason, DenyReason::PlanRequired);
    assert_eq!(event.required_plan, Some(PlanLevel::Contributor));
    assert_eq!(event.current_plan, PlanLevel::Hobby);
}

#[tokio::test]
async fn hard_denials_do_not_notify() {
    let mock = MockBackend::new();
    let map = MapConfig {
        allow_areas: false,
        ..open_map()
    };
    let engine = engine_with(&mock, map, visitor());
    let denials = engine.subscribe_access_denied();

    let decision = engine.request_action(CollabAction::Areas).await;
    assert_eq!(decision.reason, Some(DenyReason::NotAllowed));
    assert!(denials.try_recv().is_err());
}

#[tokio::test]
async fn lapsed_subscription_gates_as_hobby() {
    let mock = MockBackend::new();
    let map = MapConfig {
        posts_required_plan: Some(PlanLevel::Contributor),
        ..open_map()
    };
    let mut actor = Actor::new("acct-visitor", PlanLevel::Professional);
    actor.subscription_active = false;
    let engine = engine_with(&mock, map, actor);

    let decision = engine.request_action(CollabAction::Posts).await;
    assert_eq!(
        decision,
        AccessDecision::plan_required(PlanLevel::Contributor, PlanLevel::Hobby)
    );
}

#[tokio::test]
async fn private_map_turns_strangers_away() {
    let mock = MockBackend::new();
    let map = MapConfig {
        visibility: MapVisibility::Private,
        ..open_map()
    };
    let engine = engine_with(&mock, map, Actor::new("acct-stranger", PlanLevel::Business));

    let decision = engine.request_action(CollabAction::Pins).await;
    assert_eq!(decision.reason, Some(DenyReason::NotAllowed));
}

#[tokio::test]
async fn private_map_membership_is_fetched_once() {
    let map_id = MapId::from("map-mn");
    let account = AccountId::from("acct-visitor");
    let record = MembershipRecord {
        role: MembershipRole::Editor,
        joined_at: Utc::now(),
    };
    let mock = MockBackend::new().with_membership(&map_id, &account, record);
    let map = MapConfig {
        visibility: MapVisibility::Private,
        ..open_map()
    };
    let engine = engine_with(&mock, map, visitor());

    assert!(engine.request_action(CollabAction::Pins).await.allowed);
    assert!(engine.request_action(CollabAction::Posts).await.allowed);
    assert_eq!(mock.membership_fetches(&map_id, &account), 1);
}

#[tokio::test]
async fn view_as_lets_the_owner_preview_denials() {
    let mock = MockBackend::new();
    let map = MapConfig {
        allow_pins: false,
        ..open_map()
    };
    let engine = engine_with(&mock, map, Actor::new("acct-owner", PlanLevel::Business));

    assert!(engine.request_action(CollabAction::Pins).await.allowed);

    engine.set_view_as(ViewAsRole::Editor);
    let previewed = engine.request_action(CollabAction::Pins).await;
    assert_eq!(previewed.reason, Some(DenyReason::NotAllowed));

    engine.set_view_as(ViewAsRole::Owner);
    assert!(engine.request_action(CollabAction::Pins).await.allowed);
}

#[tokio::test]
async fn view_as_is_owner_only() {
    let mock = MockBackend::new();
    let map = MapConfig {
        visibility: MapVisibility::Private,
        ..open_map()
    };
    let engine = engine_with(&mock, map, visitor());

    engine.set_view_as(ViewAsRole::NonMember);
    assert_eq!(engine.view_as(), ViewAsRole::Owner);

    let decision = engine.request_action(CollabAction::Pins).await;
    assert_eq!(decision.reason, Some(DenyReason::NotAllowed));
}

#[tokio::test]
async fn restored_session_applies_view_as_for_the_owner() {
    let mock = MockBackend::new();
    let stored = SessionState {
        id: Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").expect("valid uuid"),
        view_as: ViewAsRole::NonMember,
    };

    let engine = engine_with(&mock, open_map(), Actor::new("acct-owner", PlanLevel::Hobby));
    engine.restore_session(stored.clone());
    assert_eq!(engine.session_state(), stored);
    assert_eq!(engine.view_as(), ViewAsRole::NonMember);

    // A visitor adopts the id but never the override.
    let engine = engine_with(&mock, open_map(), visitor());
    engine.restore_session(stored.clone());
    assert_eq!(engine.session_state().id, stored.id);
    assert_eq!(engine.view_as(), ViewAsRole::Owner);
}

#[tokio::test]
async fn plan_limits_are_memoized() {
    let features = PlanFeatureSet {
        slug: "contributor".to_string(),
        level: PlanLevel::Contributor,
        map_limit: Some(10),
        collaborator_limit: Some(25),
    };
    let mock = MockBackend::new().with_plan(features.clone());
    let engine = engine_with(&mock, open_map(), visitor());

    assert_eq!(
        engine.plan_limits(PlanLevel::Contributor).await,
        Some(features.clone())
    );
    assert_eq!(engine.plan_limits(PlanLevel::Contributor).await, Some(features));
    assert_eq!(mock.plan_fetches(PlanLevel::Contributor), 1);
}
