use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;

use crate::config;
use crate::error::{AppError, AppResult};
use crate::tiers::Tier;

use super::models::FeatureDescriptor;

#[derive(Debug, Deserialize)]
struct FeatureEntry {
    name: String,
    required_tier: String,
    #[serde(default)]
    description: String,
}

/// key: feature-catalog -> fail-fast feature registration
///
/// Process-wide registry of the product's gated capabilities. Registration
/// is the trust boundary for tier labels: an unknown label is a
/// configuration defect and is rejected here, never during a live access
/// check.
#[derive(Debug, Default)]
pub struct FeatureCatalog {
    features: DashMap<String, FeatureDescriptor>,
}

impl FeatureCatalog {
    pub fn new() -> Self {
        Self {
            features: DashMap::new(),
        }
    }

    /// Load registrations from the `FEATURE_CATALOG` env payload.
    pub fn from_env() -> AppResult<Self> {
        Self::from_value(config::FEATURE_CATALOG.clone())
    }

    pub fn from_value(payload: Value) -> AppResult<Self> {
        let entries: Vec<FeatureEntry> = serde_json::from_value(payload)
            .map_err(|err| AppError::Catalog(format!("invalid feature payload: {err}")))?;

        let catalog = Self::new();
        for entry in entries {
            let tier = Tier::parse(&entry.required_tier).ok_or(AppError::UnknownTier {
                label: entry.required_tier,
            })?;
            catalog.register(FeatureDescriptor::new(entry.name, tier, entry.description));
        }
        Ok(catalog)
    }

    /// Last registration wins on duplicate names.
    pub fn register(&self, feature: FeatureDescriptor) {
        self.features.insert(feature.name.clone(), feature);
    }

    pub fn get(&self, name: &str) -> Option<FeatureDescriptor> {
        self.features.get(name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
