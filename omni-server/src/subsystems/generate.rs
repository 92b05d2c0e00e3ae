//! Generation lifecycle — the one submit path shared by all module types
//!
//! Every generation request, regardless of category, moves through the same
//! sequence:
//! - Persist a `pending` record before the provider is called, so a crash
//!   mid-generation leaves evidence of the incomplete request
//! - Invoke the provider synchronously and time the call
//! - Finalize the record (`completed` + result, or `failed` + error message)
//!   and overwrite it in storage
//! - Best-effort session accounting when a session id accompanied the request
//!
//! Provider failures are captured into the record and never propagated;
//! storage failures propagate, since there is no consistent record to return
//! without them. There is no retry, no recovery of orphaned pending rows,
//! and no timeout on the provider call.

use std::time::{Duration, Instant};

use chrono::Utc;
use omni_core::models::generation::{Generation, GenerationStatus};
use omni_core::models::request::ModuleRequest;
use omni_core::provider::{GenerationProvider, ProviderError};
use omni_core::OmniError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::subsystems::{records, sessions};

/// A fresh `pending` record for the given request.
pub fn new_pending(request: &ModuleRequest) -> Generation {
    Generation {
        id: Uuid::new_v4(),
        session_id: request.session_id().map(str::to_string),
        module_type: request.module_type(),
        prompt: request.prompt().to_string(),
        parameters: request.parameters(),
        status: GenerationStatus::Pending,
        result: None,
        error_message: None,
        created_at: Utc::now(),
        completed_at: None,
        processing_time: None,
    }
}

/// Drive a record to its terminal state from the provider outcome.
///
/// `processing_time` is the measured wall-clock duration of the provider
/// call, in seconds.
pub fn finalize(
    mut generation: Generation,
    outcome: Result<serde_json::Value, ProviderError>,
    elapsed: Duration,
) -> Generation {
    match outcome {
        Ok(payload) => {
            generation.status = GenerationStatus::Completed;
            generation.result = Some(payload);
        }
        Err(e) => {
            generation.status = GenerationStatus::Failed;
            generation.error_message = Some(e.to_string());
        }
    }
    generation.completed_at = Some(Utc::now());
    generation.processing_time = Some(elapsed.as_secs_f64());
    generation
}

/// Submit one generation request and return the finalized record.
pub async fn submit(
    pool: &PgPool,
    provider: &dyn GenerationProvider,
    request: ModuleRequest,
) -> Result<Generation, OmniError> {
    let pending = new_pending(&request);
    records::insert(pool, &pending).await?;

    let start = Instant::now();
    let outcome = provider
        .generate(pending.module_type, &pending.prompt, &pending.parameters)
        .await;
    let generation = finalize(pending, outcome, start.elapsed());

    records::update(pool, &generation).await?;

    match generation.status {
        GenerationStatus::Failed => tracing::warn!(
            generation_id = %generation.id,
            module = %generation.module_type,
            error = generation.error_message.as_deref().unwrap_or(""),
            "generation failed"
        ),
        _ => tracing::info!(
            generation_id = %generation.id,
            module = %generation.module_type,
            provider = provider.name(),
            "generation completed"
        ),
    }

    if let Some(session_id) = request.session_id() {
        sessions::record_generation(pool, session_id).await;
    }

    Ok(generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_core::models::generation::ModuleType;
    use omni_core::models::request::{ImageRequest, WebsiteRequest};
    use serde_json::json;

    fn website_request() -> ModuleRequest {
        ModuleRequest::Website(WebsiteRequest {
            description: "a landing page for a bakery".to_string(),
            website_type: Some("landing".to_string()),
            session_id: Some("e3b1c4a2-0000-4000-8000-000000000001".to_string()),
        })
    }

    #[test]
    fn new_pending_copies_request_fields() {
        let pending = new_pending(&website_request());
        assert_eq!(pending.status, GenerationStatus::Pending);
        assert_eq!(pending.module_type, ModuleType::Website);
        assert_eq!(pending.prompt, "a landing page for a bakery");
        assert_eq!(pending.parameters["website_type"], "landing");
        assert!(pending.result.is_none());
        assert!(pending.error_message.is_none());
        assert!(pending.completed_at.is_none());
        assert!(pending.processing_time.is_none());
    }

    #[test]
    fn finalize_success_sets_result_only() {
        let pending = new_pending(&website_request());
        let done = finalize(
            pending,
            Ok(json!({"html": "<html></html>"})),
            Duration::from_millis(42),
        );

        assert_eq!(done.status, GenerationStatus::Completed);
        assert!(done.result.is_some());
        assert!(done.error_message.is_none());
        assert!(done.completed_at.is_some());
        assert!((done.processing_time.unwrap() - 0.042).abs() < 1e-9);
    }

    #[test]
    fn finalize_failure_sets_error_only() {
        let pending = new_pending(&ModuleRequest::Image(ImageRequest {
            prompt: "a lighthouse at dusk".to_string(),
            style: "realistic".to_string(),
            size: "1024x1024".to_string(),
            quality: "high".to_string(),
            session_id: None,
        }));
        let done = finalize(
            pending,
            Err(ProviderError::Backend("model overloaded".to_string())),
            Duration::from_millis(5),
        );

        assert_eq!(done.status, GenerationStatus::Failed);
        assert!(done.result.is_none());
        assert!(done
            .error_message
            .as_deref()
            .unwrap()
            .contains("model overloaded"));
        assert!(done.completed_at.is_some());
    }

    #[test]
    fn finalize_always_terminal_with_nonnegative_duration() {
        for outcome in [
            Ok(json!({})),
            Err(ProviderError::Backend("x".to_string())),
        ] {
            let done = finalize(new_pending(&website_request()), outcome, Duration::ZERO);
            assert!(done.status.is_terminal());
            assert!(done.processing_time.unwrap() >= 0.0);
            // Exactly one of result / error_message on a terminal record.
            assert_eq!(done.result.is_some(), done.error_message.is_none());
        }
    }
}
