use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tiers::Tier;

/// key: entitlement-snapshot -> session subscription state
///
/// Point-in-time view of the signed-in account's subscription. Owned by the
/// `SubscriptionProvider`; consumers only ever see immutable snapshots,
/// replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionState {
    pub active_tier: Tier,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SubscriptionState {
    /// Conservative default served before the first successful refresh.
    pub fn unsubscribed() -> Self {
        Self {
            active_tier: Tier::Free,
            is_active: false,
            expires_at: None,
        }
    }

    /// True iff the account holds an active paid subscription.
    pub fn is_subscribed(&self) -> bool {
        self.is_active && self.active_tier.is_paid()
    }
}

impl Default for SubscriptionState {
    fn default() -> Self {
        Self::unsubscribed()
    }
}

/// key: entitlement-descriptor -> gated capability
///
/// Declared at each call site; carries the user-facing description shown
/// when access is denied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub name: String,
    pub required_tier: Tier,
    pub description: String,
}

impl FeatureDescriptor {
    pub fn new(
        name: impl Into<String>,
        required_tier: Tier,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            required_tier,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    NotSubscribed,
    TierTooLow,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::NotSubscribed => "not_subscribed",
            DenialReason::TierTooLow => "tier_too_low",
        }
    }
}

/// key: entitlement-decision -> resolver output
///
/// Ephemeral; consumed immediately by the calling adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub granted: bool,
    pub reason: Option<DenialReason>,
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self {
            granted: true,
            reason: None,
        }
    }

    pub fn deny(reason: DenialReason) -> Self {
        Self {
            granted: false,
            reason: Some(reason),
        }
    }
}
