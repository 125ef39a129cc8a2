use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Structured gating event routed through the tracing pipeline.
#[derive(Debug, Serialize, Clone)]
pub struct GatingEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub details: Option<Value>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventValidationError {
    #[error("event `{event_type}` missing detail payload")]
    MissingDetails { event_type: String },
    #[error("event `{event_type}` missing required detail `{field}`")]
    MissingField {
        event_type: String,
        field: &'static str,
    },
}

/// Install the process-wide subscriber. Call once from the embedding
/// application's entrypoint.
pub fn init() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();
}

pub fn validate_event_details(
    event_type: &str,
    details: Option<&Value>,
) -> Result<(), EventValidationError> {
    match event_type {
        "entitlement_denied" => {
            let payload = required_payload(event_type, details)?;
            require_field(payload, event_type, "feature")?;
            require_field(payload, event_type, "reason")?;
            require_field(payload, event_type, "required_tier")?;
        }
        "entitlement_granted" => {
            let payload = required_payload(event_type, details)?;
            require_field(payload, event_type, "feature")?;
        }
        "subscription_refreshed" => {
            let payload = required_payload(event_type, details)?;
            require_field(payload, event_type, "tier")?;
            require_field(payload, event_type, "active")?;
        }
        _ => {}
    }
    Ok(())
}

/// Validate and emit a gating event. Malformed payloads are dropped with a
/// warning rather than propagated to gating call sites.
pub fn record(event_type: &str, details: Option<Value>) {
    if let Err(err) = validate_event_details(event_type, details.as_ref()) {
        tracing::warn!(?err, event_type, "dropping malformed gating event");
        return;
    }
    let event = GatingEvent {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        event_type: event_type.to_string(),
        details,
    };
    tracing::info!(
        target: "gating_events",
        id = %event.id,
        event_type = %event.event_type,
        details = ?event.details,
        "gating event recorded"
    );
}

fn required_payload<'a>(
    event_type: &str,
    details: Option<&'a Value>,
) -> Result<&'a Value, EventValidationError> {
    details.ok_or_else(|| EventValidationError::MissingDetails {
        event_type: event_type.to_string(),
    })
}

fn require_field<'a>(
    payload: &'a Value,
    event_type: &str,
    field: &'static str,
) -> Result<&'a Value, EventValidationError> {
    payload
        .get(field)
        .ok_or_else(|| EventValidationError::MissingField {
            event_type: event_type.to_string(),
            field,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn denial_events_require_expected_fields() {
        let payload = json!({
            "feature": "pdf_export",
            "reason": "tier_too_low",
            "required_tier": "premium",
        });

        assert!(validate_event_details("entitlement_denied", Some(&payload)).is_ok());
    }

    #[test]
    fn missing_denial_field_is_reported() {
        let payload = json!({
            "feature": "pdf_export",
            "required_tier": "premium",
        });

        let err = validate_event_details("entitlement_denied", Some(&payload))
            .expect_err("missing reason should error");
        assert!(matches!(
            err,
            EventValidationError::MissingField {
                field: "reason",
                ..
            }
        ));
    }

    #[test]
    fn refresh_events_require_payload() {
        let err = validate_event_details("subscription_refreshed", None)
            .expect_err("missing payload should error");
        assert!(matches!(err, EventValidationError::MissingDetails { .. }));
    }

    #[test]
    fn unknown_event_types_pass_through() {
        assert!(validate_event_details("session_started", None).is_ok());
    }
}
