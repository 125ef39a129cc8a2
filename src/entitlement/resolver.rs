use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::notify::{Notification, NotificationChannel};
use crate::telemetry;
use crate::tiers::Tier;

use super::models::{AccessDecision, DenialReason, FeatureDescriptor};
use super::provider::SubscriptionProvider;

// key: entitlement-resolver -> access-decisions,denial-consequence

/// Sole authority translating a feature descriptor plus the current
/// subscription snapshot into an access decision.
///
/// The decision itself is pure (`evaluate`); the standard denial
/// consequence is layered on top in `check_access` so the decision stays
/// testable without a notification sink.
pub struct EntitlementResolver {
    provider: Arc<SubscriptionProvider>,
    notifier: Arc<dyn NotificationChannel>,
}

impl EntitlementResolver {
    pub fn new(
        provider: Arc<SubscriptionProvider>,
        notifier: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self { provider, notifier }
    }

    /// Pure decision step; no side effects.
    ///
    /// Free-tier features are granted unconditionally. Everything else
    /// requires an active subscription whose tier ranks at least as high as
    /// the feature's requirement. A never-refreshed provider counts as not
    /// subscribed, never as an error.
    pub fn evaluate(&self, feature: &FeatureDescriptor) -> AccessDecision {
        if feature.required_tier == Tier::Free {
            return AccessDecision::allow();
        }

        let state = self.provider.state();
        if !state.is_active {
            return AccessDecision::deny(DenialReason::NotSubscribed);
        }
        if !state.active_tier.at_least(feature.required_tier) {
            return AccessDecision::deny(DenialReason::TierTooLow);
        }
        AccessDecision::allow()
    }

    /// Decision plus the standard denial consequence: a warning toast
    /// carrying the feature's description, published fire-and-forget.
    /// Repeated calls under unchanged state repeat both; call sites control
    /// their own invocation frequency.
    pub fn check_access(&self, feature: &FeatureDescriptor) -> bool {
        let decision = self.evaluate(feature);
        if decision.granted {
            debug!(feature = %feature.name, "entitlement granted");
            return true;
        }

        let reason = decision.reason.unwrap_or(DenialReason::NotSubscribed);
        info!(
            feature = %feature.name,
            reason = reason.as_str(),
            required = %feature.required_tier,
            "entitlement denied"
        );
        telemetry::record(
            "entitlement_denied",
            Some(json!({
                "feature": feature.name,
                "reason": reason.as_str(),
                "required_tier": feature.required_tier.as_str(),
            })),
        );
        self.notifier.publish(Notification::warning(
            "Upgrade required",
            feature.description.clone(),
        ));
        false
    }
}
