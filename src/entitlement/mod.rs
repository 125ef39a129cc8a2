pub mod catalog;
pub mod models;
pub mod provider;
pub mod resolver;

pub use catalog::FeatureCatalog;
pub use models::{AccessDecision, DenialReason, FeatureDescriptor, SubscriptionState};
pub use provider::SubscriptionProvider;
pub use resolver::EntitlementResolver;
