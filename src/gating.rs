use std::sync::Arc;

use tracing::debug;

use crate::config;
use crate::entitlement::{EntitlementResolver, FeatureDescriptor, SubscriptionProvider};
use crate::nav::{Navigator, Route};

// key: gating-adapters -> action-guard,upsell-overlay

/// Outcome of one guarded interaction. The control returns to idle either
/// way; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Granted,
    Denied,
}

/// Tier-ranked guard wrapped around an interactive control.
///
/// The lock affordance reflects the feature's requirement, not the live
/// decision; only the interaction path consults the resolver.
pub struct GuardedAction {
    feature: FeatureDescriptor,
    resolver: Arc<EntitlementResolver>,
}

impl GuardedAction {
    pub fn new(feature: FeatureDescriptor, resolver: Arc<EntitlementResolver>) -> Self {
        Self { feature, resolver }
    }

    pub fn feature(&self) -> &FeatureDescriptor {
        &self.feature
    }

    /// Whether the control renders a lock affordance.
    pub fn locked(&self) -> bool {
        self.feature.required_tier.is_paid()
    }

    /// Run one interaction: check entitlement, invoke the wrapped action
    /// only when granted. Denials have already notified by the time this
    /// returns.
    pub fn trigger<F>(&self, action: F) -> GateOutcome
    where
        F: FnOnce(),
    {
        if self.resolver.check_access(&self.feature) {
            action();
            GateOutcome::Granted
        } else {
            GateOutcome::Denied
        }
    }
}

/// How overlay-wrapped content should render.
pub enum OverlayView<'a, T> {
    /// Subscribed account: content renders plainly.
    Plain(&'a T),
    /// Unsubscribed account: content stays visible but inert, optionally
    /// behind an upsell prompt.
    Obscured {
        content: &'a T,
        upsell: Option<UpsellPrompt>,
    },
}

/// key: upsell-overlay -> binary subscribed gate
///
/// Obscures wrapped content for unsubscribed accounts. Any active paid
/// subscription suffices regardless of tier; this binary policy is
/// deliberately distinct from `GuardedAction`'s tier-ranked check and the
/// two must not be merged.
pub struct UpsellOverlay {
    provider: Arc<SubscriptionProvider>,
    navigator: Option<Arc<dyn Navigator>>,
    headline: String,
}

impl UpsellOverlay {
    /// Overlay without an upsell prompt; content is only obscured.
    pub fn new(provider: Arc<SubscriptionProvider>) -> Self {
        Self {
            provider,
            navigator: None,
            headline: String::new(),
        }
    }

    /// Overlay with a call-to-action routing into the upgrade flow.
    pub fn with_upsell(
        provider: Arc<SubscriptionProvider>,
        navigator: Arc<dyn Navigator>,
        headline: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            navigator: Some(navigator),
            headline: headline.into(),
        }
    }

    pub fn view<'a, T>(&self, content: &'a T) -> OverlayView<'a, T> {
        if self.provider.is_subscribed() {
            return OverlayView::Plain(content);
        }

        let upsell = self.navigator.clone().map(|navigator| UpsellPrompt {
            navigator,
            headline: self.headline.clone(),
            plan: config::UPGRADE_PLAN_CODE.clone(),
        });
        OverlayView::Obscured { content, upsell }
    }
}

/// Call-to-action attached to an obscured overlay.
pub struct UpsellPrompt {
    navigator: Arc<dyn Navigator>,
    headline: String,
    plan: String,
}

impl UpsellPrompt {
    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    /// Route the user into the checkout flow for the default plan.
    pub fn activate(&self) {
        debug!(plan = %self.plan, "upsell prompt activated");
        self.navigator.navigate(Route::Upgrade {
            plan: self.plan.clone(),
        });
    }

    /// Secondary action: open the plan comparison page.
    pub fn browse_plans(&self) {
        self.navigator.navigate(Route::Plans);
    }
}
