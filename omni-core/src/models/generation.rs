use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The seven generation categories the platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Website,
    Game,
    Content,
    Image,
    Code,
    Data,
    Creative,
}

impl ModuleType {
    pub const ALL: [ModuleType; 7] = [
        ModuleType::Website,
        ModuleType::Game,
        ModuleType::Content,
        ModuleType::Image,
        ModuleType::Code,
        ModuleType::Data,
        ModuleType::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Website => "website",
            ModuleType::Game => "game",
            ModuleType::Content => "content",
            ModuleType::Image => "image",
            ModuleType::Code => "code",
            ModuleType::Data => "data",
            ModuleType::Creative => "creative",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown module type: {0}")]
pub struct ParseModuleTypeError(String);

impl FromStr for ModuleType {
    type Err = ParseModuleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "website" => Ok(ModuleType::Website),
            "game" => Ok(ModuleType::Game),
            "content" => Ok(ModuleType::Content),
            "image" => Ok(ModuleType::Image),
            "code" => Ok(ModuleType::Code),
            "data" => Ok(ModuleType::Data),
            "creative" => Ok(ModuleType::Creative),
            other => Err(ParseModuleTypeError(other.to_string())),
        }
    }
}

impl TryFrom<String> for ModuleType {
    type Error = ParseModuleTypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Lifecycle state of a generation record.
///
/// Transitions are monotonic: pending → processing → {completed | failed}.
/// A terminal record is never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Pending => "pending",
            GenerationStatus::Processing => "processing",
            GenerationStatus::Completed => "completed",
            GenerationStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStatus::Completed | GenerationStatus::Failed)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown generation status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for GenerationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(GenerationStatus::Pending),
            "processing" => Ok(GenerationStatus::Processing),
            "completed" => Ok(GenerationStatus::Completed),
            "failed" => Ok(GenerationStatus::Failed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for GenerationStatus {
    type Error = ParseStatusError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One generation attempt, from pending to its terminal state.
///
/// `session_id` is a weak reference: free text that may name a session that
/// does not exist. Exactly one of `result` / `error_message` is set once the
/// record is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Generation {
    pub id: Uuid,
    pub session_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub module_type: ModuleType,
    pub prompt: String,
    pub parameters: serde_json::Value,
    #[sqlx(try_from = "String")]
    pub status: GenerationStatus,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Measured wall-clock seconds of the provider call, set with completed_at.
    pub processing_time: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_type_round_trips_through_str() {
        for m in ModuleType::ALL {
            assert_eq!(m.as_str().parse::<ModuleType>().unwrap(), m);
        }
    }

    #[test]
    fn module_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ModuleType::Website).unwrap(),
            "\"website\""
        );
        assert_eq!(
            serde_json::from_str::<ModuleType>("\"creative\"").unwrap(),
            ModuleType::Creative
        );
    }

    #[test]
    fn unknown_module_type_is_rejected() {
        assert!("video".parse::<ModuleType>().is_err());
    }

    #[test]
    fn status_terminality() {
        assert!(!GenerationStatus::Pending.is_terminal());
        assert!(!GenerationStatus::Processing.is_terminal());
        assert!(GenerationStatus::Completed.is_terminal());
        assert!(GenerationStatus::Failed.is_terminal());
    }

    #[test]
    fn status_parses_lowercase() {
        assert_eq!(
            "failed".parse::<GenerationStatus>().unwrap(),
            GenerationStatus::Failed
        );
        assert!("done".parse::<GenerationStatus>().is_err());
    }
}
