//! Per-module request shapes, unified under one tagged `ModuleRequest`.
//!
//! Each generation category accepts its own body shape (the HTTP layer
//! deserializes the concrete struct), but all seven collapse into the single
//! `ModuleRequest` union before reaching the lifecycle — one polymorphic
//! submit path, not seven bespoke ones.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::generation::ModuleType;

fn default_platform() -> String {
    "web".to_string()
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_length() -> String {
    "medium".to_string()
}

fn default_image_style() -> String {
    "realistic".to_string()
}

fn default_size() -> String {
    "1024x1024".to_string()
}

fn default_quality() -> String {
    "high".to_string()
}

fn default_language() -> String {
    "javascript".to_string()
}

fn default_data_source() -> String {
    "text".to_string()
}

fn default_creative_style() -> String {
    "modern".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteRequest {
    pub description: String,
    #[serde(default)]
    pub website_type: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub game_idea: String,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    pub content_type: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default = "default_image_style")]
    pub style: String,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRequest {
    pub request: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRequest {
    pub data_input: String,
    pub analysis_type: String,
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeRequest {
    pub prompt: String,
    pub creative_type: String,
    #[serde(default = "default_creative_style")]
    pub style: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// The union of the seven request shapes, tagged by module type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "module_type", rename_all = "lowercase")]
pub enum ModuleRequest {
    Website(WebsiteRequest),
    Game(GameRequest),
    Content(ContentRequest),
    Image(ImageRequest),
    Code(CodeRequest),
    Data(DataRequest),
    Creative(CreativeRequest),
}

impl ModuleRequest {
    pub fn module_type(&self) -> ModuleType {
        match self {
            ModuleRequest::Website(_) => ModuleType::Website,
            ModuleRequest::Game(_) => ModuleType::Game,
            ModuleRequest::Content(_) => ModuleType::Content,
            ModuleRequest::Image(_) => ModuleType::Image,
            ModuleRequest::Code(_) => ModuleType::Code,
            ModuleRequest::Data(_) => ModuleType::Data,
            ModuleRequest::Creative(_) => ModuleType::Creative,
        }
    }

    /// The module's primary text field, recorded as the generation prompt.
    pub fn prompt(&self) -> &str {
        match self {
            ModuleRequest::Website(r) => &r.description,
            ModuleRequest::Game(r) => &r.game_idea,
            ModuleRequest::Content(r) => &r.topic,
            ModuleRequest::Image(r) => &r.prompt,
            ModuleRequest::Code(r) => &r.request,
            ModuleRequest::Data(r) => &r.data_input,
            ModuleRequest::Creative(r) => &r.prompt,
        }
    }

    /// The module-specific parameter bag persisted with the record.
    pub fn parameters(&self) -> Value {
        match self {
            ModuleRequest::Website(r) => json!({
                "website_type": r.website_type,
            }),
            ModuleRequest::Game(r) => json!({
                "game_type": r.game_type,
                "platform": r.platform,
            }),
            ModuleRequest::Content(r) => json!({
                "content_type": r.content_type,
                "tone": r.tone,
                "length": r.length,
            }),
            ModuleRequest::Image(r) => json!({
                "style": r.style,
                "size": r.size,
                "quality": r.quality,
            }),
            ModuleRequest::Code(r) => json!({
                "language": r.language,
                "task_type": r.task_type,
            }),
            ModuleRequest::Data(r) => json!({
                "analysis_type": r.analysis_type,
                "data_source": r.data_source,
            }),
            ModuleRequest::Creative(r) => json!({
                "creative_type": r.creative_type,
                "style": r.style,
                "mood": r.mood,
            }),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            ModuleRequest::Website(r) => r.session_id.as_deref(),
            ModuleRequest::Game(r) => r.session_id.as_deref(),
            ModuleRequest::Content(r) => r.session_id.as_deref(),
            ModuleRequest::Image(r) => r.session_id.as_deref(),
            ModuleRequest::Code(r) => r.session_id.as_deref(),
            ModuleRequest::Data(r) => r.session_id.as_deref(),
            ModuleRequest::Creative(r) => r.session_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_request_fills_defaults() {
        let r: GameRequest = serde_json::from_str(r#"{"game_idea": "a roguelike"}"#).unwrap();
        assert_eq!(r.platform, "web");
        assert!(r.game_type.is_none());
        assert!(r.session_id.is_none());
    }

    #[test]
    fn image_request_fills_defaults() {
        let r: ImageRequest = serde_json::from_str(r#"{"prompt": "a lighthouse"}"#).unwrap();
        assert_eq!(r.style, "realistic");
        assert_eq!(r.size, "1024x1024");
        assert_eq!(r.quality, "high");
    }

    #[test]
    fn tagged_union_dispatches_on_module_type() {
        let req: ModuleRequest = serde_json::from_str(
            r#"{"module_type": "code", "request": "sort a vec", "language": "rust"}"#,
        )
        .unwrap();
        assert_eq!(req.module_type(), ModuleType::Code);
        assert_eq!(req.prompt(), "sort a vec");
        assert_eq!(req.parameters()["language"], "rust");
    }

    #[test]
    fn prompt_maps_to_the_module_primary_field() {
        let req = ModuleRequest::Website(WebsiteRequest {
            description: "portfolio site".to_string(),
            website_type: Some("portfolio".to_string()),
            session_id: None,
        });
        assert_eq!(req.prompt(), "portfolio site");
        assert_eq!(req.parameters()["website_type"], "portfolio");
    }

    #[test]
    fn optional_params_serialize_as_null() {
        let req = ModuleRequest::Creative(CreativeRequest {
            prompt: "a haiku about rust".to_string(),
            creative_type: "poetry".to_string(),
            style: "modern".to_string(),
            mood: None,
            session_id: Some("s-1".to_string()),
        });
        assert!(req.parameters()["mood"].is_null());
        assert_eq!(req.session_id(), Some("s-1"));
    }
}
