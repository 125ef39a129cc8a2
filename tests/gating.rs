use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clinic_backend::account::{AccountEntitlement, AccountService};
use clinic_backend::entitlement::{EntitlementResolver, FeatureDescriptor, SubscriptionProvider};
use clinic_backend::error::AppResult;
use clinic_backend::gating::{GateOutcome, GuardedAction, OverlayView, UpsellOverlay};
use clinic_backend::nav::{Navigator, Route};
use clinic_backend::notify::{NullChannel, ToastHub};
use clinic_backend::tiers::Tier;
use uuid::Uuid;

// key: gating-tests -> action-guard,overlay-upsell

struct StaticAccount {
    status: &'static str,
    tier: &'static str,
}

#[async_trait]
impl AccountService for StaticAccount {
    async fn fetch_entitlement(&self) -> AppResult<AccountEntitlement> {
        Ok(AccountEntitlement {
            account_id: Uuid::new_v4(),
            status: self.status.to_string(),
            tier: self.tier.to_string(),
            expires_at: None,
        })
    }
}

async fn subscribed_provider(tier: &'static str) -> Arc<SubscriptionProvider> {
    let provider = Arc::new(SubscriptionProvider::new(Arc::new(StaticAccount {
        status: "active",
        tier,
    })));
    provider.refresh().await.expect("refresh against stub");
    provider
}

fn unsubscribed_provider() -> Arc<SubscriptionProvider> {
    Arc::new(SubscriptionProvider::new(Arc::new(StaticAccount {
        status: "canceled",
        tier: "free",
    })))
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().expect("routes lock").push(route);
    }
}

#[tokio::test]
async fn guard_runs_action_only_when_granted() {
    let provider = subscribed_provider("premium").await;
    let resolver = Arc::new(EntitlementResolver::new(provider, Arc::new(NullChannel)));
    let guard = GuardedAction::new(
        FeatureDescriptor::new("pdf_export", Tier::Premium, "Export records as PDF"),
        resolver,
    );

    let ran = AtomicBool::new(false);
    let outcome = guard.trigger(|| ran.store(true, Ordering::SeqCst));
    assert_eq!(outcome, GateOutcome::Granted);
    assert!(ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn guard_blocks_and_notifies_when_denied() {
    let provider = unsubscribed_provider();
    let (hub, mut toasts) = ToastHub::channel();
    let resolver = Arc::new(EntitlementResolver::new(provider, Arc::new(hub)));
    let guard = GuardedAction::new(
        FeatureDescriptor::new("pdf_export", Tier::Premium, "Export records as PDF"),
        resolver,
    );

    let ran = AtomicBool::new(false);
    let outcome = guard.trigger(|| ran.store(true, Ordering::SeqCst));
    assert_eq!(outcome, GateOutcome::Denied);
    assert!(!ran.load(Ordering::SeqCst), "denied interaction must not run the action");

    let toast = toasts.try_recv().expect("denial toast");
    assert_eq!(toast.body, "Export records as PDF");
}

#[tokio::test]
async fn guard_returns_to_idle_between_interactions() {
    let provider = unsubscribed_provider();
    let resolver = Arc::new(EntitlementResolver::new(provider, Arc::new(NullChannel)));
    let guard = GuardedAction::new(
        FeatureDescriptor::new("pdf_export", Tier::Premium, "Export records as PDF"),
        resolver,
    );

    let attempts = AtomicUsize::new(0);
    for _ in 0..3 {
        let outcome = guard.trigger(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(outcome, GateOutcome::Denied);
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn lock_affordance_reflects_requirement_not_decision() {
    let provider = subscribed_provider("enterprise").await;
    let resolver = Arc::new(EntitlementResolver::new(provider, Arc::new(NullChannel)));

    let paid = GuardedAction::new(
        FeatureDescriptor::new("pdf_export", Tier::Premium, "Export"),
        resolver.clone(),
    );
    let free = GuardedAction::new(
        FeatureDescriptor::new("patient_search", Tier::Free, "Search"),
        resolver,
    );

    // locked even though this enterprise account would be granted
    assert!(paid.locked());
    assert!(!free.locked());
}

#[tokio::test]
async fn overlay_renders_plainly_for_subscribers() {
    let provider = subscribed_provider("basic").await;
    let overlay = UpsellOverlay::new(provider);
    let table = vec!["row-1", "row-2"];

    match overlay.view(&table) {
        OverlayView::Plain(content) => assert_eq!(content, &table),
        OverlayView::Obscured { .. } => panic!("subscribed content must render plainly"),
    }
}

#[tokio::test]
async fn overlay_obscures_and_routes_upsell_to_default_plan() {
    let provider = unsubscribed_provider();
    let navigator = Arc::new(RecordingNavigator::default());
    let overlay = UpsellOverlay::with_upsell(
        provider,
        navigator.clone(),
        "Unlock the full patient history",
    );
    let table = vec!["row-1", "row-2"];

    match overlay.view(&table) {
        OverlayView::Obscured { content, upsell } => {
            assert_eq!(content, &table, "obscured content stays present");
            let prompt = upsell.expect("upsell prompt for unsubscribed view");
            assert_eq!(prompt.headline(), "Unlock the full patient history");
            assert_eq!(prompt.plan(), "premium-monthly");

            prompt.activate();
            prompt.browse_plans();
        }
        OverlayView::Plain(_) => panic!("unsubscribed content must be obscured"),
    }

    let routes = navigator.routes.lock().expect("routes lock");
    assert_eq!(
        *routes,
        vec![
            Route::Upgrade {
                plan: "premium-monthly".to_string()
            },
            Route::Plans,
        ]
    );
}

#[tokio::test]
async fn overlay_without_navigator_has_no_prompt() {
    let overlay = UpsellOverlay::new(unsubscribed_provider());

    match overlay.view(&"chart") {
        OverlayView::Obscured { upsell, .. } => assert!(upsell.is_none()),
        OverlayView::Plain(_) => panic!("unsubscribed content must be obscured"),
    }
}

// the binary subscribed policy ignores tier rank; a basic subscription
// unlocks overlay content that a tier-ranked guard would still deny
#[tokio::test]
async fn overlay_policy_is_binary_not_tier_ranked() {
    let provider = subscribed_provider("basic").await;
    let resolver = Arc::new(EntitlementResolver::new(
        provider.clone(),
        Arc::new(NullChannel),
    ));

    let overlay = UpsellOverlay::new(provider);
    assert!(matches!(overlay.view(&"chart"), OverlayView::Plain(_)));

    let guard = GuardedAction::new(
        FeatureDescriptor::new("pdf_export", Tier::Premium, "Export"),
        resolver,
    );
    assert_eq!(guard.trigger(|| {}), GateOutcome::Denied);
}
