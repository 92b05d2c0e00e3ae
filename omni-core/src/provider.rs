//! Generation provider abstraction — pluggable result backends
//!
//! Provides a `GenerationProvider` trait with one shipped implementation:
//! - **Mock** — deterministic canned payloads per module type, used until a
//!   real inference backend is wired in.
//!
//! The provider is an external collaborator from the lifecycle's point of
//! view: a function from (module type, prompt, parameters) to a structured
//! JSON payload or a failure. Provider failures are captured into the
//! generation record by the caller, never surfaced to the HTTP client.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::GenerationConfig;
use crate::models::generation::ModuleType;

// ============================================================================
// GenerationProvider trait
// ============================================================================

/// Abstraction over generation backends.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Produce a result payload for one generation request.
    async fn generate(
        &self,
        module: ModuleType,
        prompt: &str,
        parameters: &Value,
    ) -> Result<Value, ProviderError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

/// Generation backend errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("module {module} is not supported by this backend")]
    Unsupported { module: ModuleType },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("unknown provider backend: {0}")]
    UnknownBackend(String),
}

/// Create the configured backend.
pub fn create_provider(
    config: &GenerationConfig,
) -> Result<Box<dyn GenerationProvider>, ProviderError> {
    match config.provider.as_str() {
        "mock" => Ok(Box::new(MockProvider)),
        other => Err(ProviderError::UnknownBackend(other.to_string())),
    }
}

// ============================================================================
// MockProvider
// ============================================================================

/// Canned-payload backend. Deterministic: the payload echoes the prompt and
/// parameters so callers and tests can see exactly what was requested.
#[derive(Debug, Clone, Default)]
pub struct MockProvider;

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn generate(
        &self,
        module: ModuleType,
        prompt: &str,
        parameters: &Value,
    ) -> Result<Value, ProviderError> {
        Ok(mock_payload(module, prompt, parameters))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn mock_payload(module: ModuleType, prompt: &str, parameters: &Value) -> Value {
    match module {
        ModuleType::Website => json!({
            "title": format!("Generated site: {}", prompt),
            "html": format!("<!DOCTYPE html><html><body><h1>{}</h1></body></html>", prompt),
            "css": "body { font-family: system-ui, sans-serif; margin: 2rem; }",
            "pages": ["Home", "About", "Contact"],
            "website_type": parameters["website_type"],
        }),
        ModuleType::Game => json!({
            "name": format!("Game concept: {}", prompt),
            "genre": parameters["game_type"],
            "platform": parameters["platform"],
            "mechanics": ["movement", "scoring", "progression"],
            "description": format!("A playable prototype built around: {}", prompt),
        }),
        ModuleType::Content => json!({
            "title": prompt,
            "content_type": parameters["content_type"],
            "tone": parameters["tone"],
            "body": format!(
                "An article about {} written in a {} tone.",
                prompt, parameters["tone"].as_str().unwrap_or("neutral")
            ),
            "word_count": 250,
        }),
        ModuleType::Image => json!({
            "images": [{
                "url": format!("https://images.example/mock/{}.png",
                    prompt.to_lowercase().replace(' ', "-")),
                "prompt": prompt,
                "style": parameters["style"],
                "size": parameters["size"],
            }],
            "quality": parameters["quality"],
        }),
        ModuleType::Code => json!({
            "language": parameters["language"],
            "code": format!("// {}\nfn main() {{ todo!() }}", prompt),
            "explanation": format!("Skeleton implementation for: {}", prompt),
            "task_type": parameters["task_type"],
        }),
        ModuleType::Data => json!({
            "analysis_type": parameters["analysis_type"],
            "summary": format!("Analysis of the provided input ({} chars).", prompt.len()),
            "insights": ["trend detected", "two outliers flagged"],
            "data_source": parameters["data_source"],
        }),
        ModuleType::Creative => json!({
            "creative_type": parameters["creative_type"],
            "style": parameters["style"],
            "mood": parameters["mood"],
            "text": format!("A {} piece inspired by: {}",
                parameters["creative_type"].as_str().unwrap_or("creative"), prompt),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generation::ModuleType;

    #[tokio::test]
    async fn mock_covers_every_module() {
        let provider = MockProvider;
        for m in ModuleType::ALL {
            let payload = provider
                .generate(m, "test prompt", &json!({}))
                .await
                .unwrap();
            assert!(payload.is_object(), "{m} payload must be an object");
        }
    }

    #[tokio::test]
    async fn mock_echoes_prompt_and_parameters() {
        let provider = MockProvider;
        let payload = provider
            .generate(
                ModuleType::Code,
                "parse a csv",
                &json!({"language": "rust", "task_type": null}),
            )
            .await
            .unwrap();
        assert_eq!(payload["language"], "rust");
        assert!(payload["code"].as_str().unwrap().contains("parse a csv"));
    }

    #[test]
    fn factory_rejects_unknown_backend() {
        let config = GenerationConfig {
            provider: "gpt-unreleased".to_string(),
        };
        assert!(matches!(
            create_provider(&config),
            Err(ProviderError::UnknownBackend(_))
        ));
    }

    #[test]
    fn factory_builds_mock() {
        let provider = create_provider(&GenerationConfig::default()).unwrap();
        assert_eq!(provider.name(), "mock");
    }
}
