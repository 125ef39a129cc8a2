use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::account::{AccountEntitlement, AccountService};
use crate::telemetry;
use crate::tiers::Tier;

use super::models::SubscriptionState;

/// key: subscription-provider -> session snapshot owner
///
/// Sole owner of the session's `SubscriptionState`. Readers get the last
/// installed snapshot without blocking; `refresh` is the only writer and
/// replaces the snapshot wholesale.
pub struct SubscriptionProvider {
    account: Arc<dyn AccountService>,
    snapshot: RwLock<Arc<SubscriptionState>>,
    generation: AtomicU64,
    refresh_gate: Mutex<()>,
}

impl SubscriptionProvider {
    /// Starts with the conservative default: lowest tier, not subscribed.
    pub fn new(account: Arc<dyn AccountService>) -> Self {
        Self {
            account,
            snapshot: RwLock::new(Arc::new(SubscriptionState::unsubscribed())),
            generation: AtomicU64::new(0),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Last installed snapshot. Never blocks on an in-flight refresh.
    pub fn state(&self) -> Arc<SubscriptionState> {
        // the writer only swaps the Arc, so the lock cannot be poisoned
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True iff the account holds an active paid subscription.
    pub fn is_subscribed(&self) -> bool {
        self.state().is_subscribed()
    }

    /// Re-fetch entitlement from the account service and install a fresh
    /// snapshot. On failure the previous snapshot is retained and the error
    /// surfaces only to this caller. Concurrent calls collapse onto a
    /// single upstream fetch; callers that waited observe its result.
    pub async fn refresh(&self) -> Result<Arc<SubscriptionState>> {
        let observed = self.generation.load(Ordering::Acquire);
        let _gate = self.refresh_gate.lock().await;
        if self.generation.load(Ordering::Acquire) != observed {
            // another caller finished a refresh while we waited on the gate
            return Ok(self.state());
        }

        let payload = match self.account.fetch_entitlement().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(?err, "subscription refresh failed; serving previous snapshot");
                return Err(err).context("account service refresh failed");
            }
        };
        let state = Arc::new(snapshot_from_payload(&payload)?);

        {
            let mut slot = self
                .snapshot
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *slot = state.clone();
        }
        self.generation.fetch_add(1, Ordering::AcqRel);

        telemetry::record(
            "subscription_refreshed",
            Some(json!({
                "tier": state.active_tier.as_str(),
                "active": state.is_active,
            })),
        );
        debug!(
            tier = %state.active_tier,
            active = state.is_active,
            "subscription snapshot replaced"
        );
        Ok(state)
    }
}

fn snapshot_from_payload(payload: &AccountEntitlement) -> Result<SubscriptionState> {
    let tier = Tier::parse(&payload.tier).ok_or_else(|| {
        anyhow!(
            "account service returned unknown tier `{}` for account {}",
            payload.tier,
            payload.account_id
        )
    })?;

    let lapsed = payload
        .expires_at
        .map(|end| end < Utc::now())
        .unwrap_or(false);
    let is_active = matches!(payload.status.as_str(), "active" | "trialing") && !lapsed;

    Ok(SubscriptionState {
        active_tier: tier,
        is_active,
        expires_at: payload.expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn payload(status: &str, tier: &str, expires_at: Option<chrono::DateTime<Utc>>) -> AccountEntitlement {
        AccountEntitlement {
            account_id: Uuid::new_v4(),
            status: status.to_string(),
            tier: tier.to_string(),
            expires_at,
        }
    }

    #[test]
    fn active_statuses_map_to_active_state() {
        for status in ["active", "trialing"] {
            let state = snapshot_from_payload(&payload(status, "premium", None)).unwrap();
            assert!(state.is_active);
            assert_eq!(state.active_tier, Tier::Premium);
        }
    }

    #[test]
    fn canceled_status_is_inactive() {
        let state = snapshot_from_payload(&payload("canceled", "premium", None)).unwrap();
        assert!(!state.is_active);
    }

    #[test]
    fn lapsed_expiry_deactivates() {
        let past = Utc::now() - Duration::days(1);
        let state = snapshot_from_payload(&payload("active", "basic", Some(past))).unwrap();
        assert!(!state.is_active);

        let future = Utc::now() + Duration::days(30);
        let state = snapshot_from_payload(&payload("active", "basic", Some(future))).unwrap();
        assert!(state.is_active);
    }

    #[test]
    fn unknown_tier_label_is_rejected() {
        assert!(snapshot_from_payload(&payload("active", "platinum", None)).is_err());
    }
}
