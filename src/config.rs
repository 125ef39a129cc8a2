use once_cell::sync::Lazy;
use std::fs;

use serde_json::{json, Value};

/// Base URL used to contact the account/session service.
pub static ACCOUNT_SERVICE_ENDPOINT: Lazy<String> = Lazy::new(|| {
    std::env::var("ACCOUNT_SERVICE_ENDPOINT")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "http://127.0.0.1:8700".to_string())
});

/// Optional bearer token presented to the account service. May also be
/// supplied via `ACCOUNT_SERVICE_TOKEN_FILE`.
pub static ACCOUNT_SERVICE_TOKEN: Lazy<Option<String>> =
    Lazy::new(|| read_secret_env("ACCOUNT_SERVICE_TOKEN", "ACCOUNT_SERVICE_TOKEN_FILE"));

/// key: entitlement-config -> default checkout plan for upsell navigation
pub static UPGRADE_PLAN_CODE: Lazy<String> = Lazy::new(|| {
    read_optional_env("UPGRADE_PLAN_CODE").unwrap_or_else(|| "premium-monthly".to_string())
});

/// key: entitlement-config -> gated feature registrations
///
/// JSON array of `{name, required_tier, description}` objects. Parsed and
/// validated by `FeatureCatalog::from_env`; unknown tier labels abort
/// startup.
pub static FEATURE_CATALOG: Lazy<Value> =
    Lazy::new(|| json_from_env("FEATURE_CATALOG", json!([])));

fn read_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_secret_env(value_key: &str, file_key: &str) -> Option<String> {
    if let Some(path) = read_optional_env(file_key) {
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    return Some(trimmed);
                }
            }
            Err(err) => panic!("failed to read {file_key} from {path}: {err}"),
        }
    }

    read_optional_env(value_key)
}

fn json_from_env(var: &str, default_value: Value) -> Value {
    match std::env::var(var) {
        Ok(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                default_value
            } else {
                serde_json::from_str(trimmed)
                    .unwrap_or_else(|err| panic!("failed to parse {var} as JSON: {err}"))
            }
        }
        Err(_) => default_value,
    }
}
