//! Read-only aggregation over sessions and generation records.

use std::collections::BTreeMap;

use omni_core::models::generation::Generation;
use omni_core::OmniError;
use serde::Serialize;
use sqlx::PgPool;

use crate::subsystems::records;

/// Default page size for history listings
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Maximum allowed page size for history listings
pub const MAX_HISTORY_LIMIT: i64 = 200;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub generations: Vec<Generation>,
    /// Count of the returned page, not of all matching records.
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct PlatformStats {
    pub total_sessions: i64,
    pub total_generations: i64,
    pub module_stats: BTreeMap<String, i64>,
    pub status: &'static str,
}

/// A session's generation history, newest first, bounded by `limit`
/// (clamped to [1, 200], default 50).
pub async fn history(
    pool: &PgPool,
    session_id: &str,
    limit: Option<i64>,
) -> Result<HistoryResponse, OmniError> {
    let limit = limit
        .map(|l| l.clamp(1, MAX_HISTORY_LIMIT))
        .unwrap_or(DEFAULT_HISTORY_LIMIT);

    let generations = records::list_by_session(pool, session_id, limit).await?;
    let total = generations.len();

    Ok(HistoryResponse { generations, total })
}

/// Platform-wide counters. Pure aggregation, eventually consistent with
/// concurrent writers.
pub async fn platform_stats(pool: &PgPool) -> Result<PlatformStats, OmniError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM studio_sessions")
        .fetch_one(pool)
        .await?;
    let total_sessions = row.0;

    let total_generations = records::count(pool).await?;
    let module_stats = records::aggregate_by_module(pool).await?;

    Ok(PlatformStats {
        total_sessions,
        total_generations,
        module_stats,
        status: "operational",
    })
}
