pub mod account;
pub mod entitlement;
pub mod error;
pub mod gating;
pub mod nav;
pub mod notify;
pub mod telemetry;
pub mod tiers;

mod config;

pub use config::{ACCOUNT_SERVICE_ENDPOINT, FEATURE_CATALOG, UPGRADE_PLAN_CODE};

pub use entitlement::{
    AccessDecision, DenialReason, EntitlementResolver, FeatureCatalog, FeatureDescriptor,
    SubscriptionProvider, SubscriptionState,
};
pub use tiers::Tier;
