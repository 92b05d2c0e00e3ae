use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub session_token: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub generations_count: i32,
    pub metadata: serde_json::Value,
}

impl Session {
    /// A fresh session with zeroed counters. The token is an opaque uuid-v4
    /// string, distinct from the row id.
    pub fn new(metadata: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            session_token: Uuid::new_v4().to_string(),
            created_at: now,
            last_activity: now,
            generations_count: 0,
            metadata,
        }
    }
}
