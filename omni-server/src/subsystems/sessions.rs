use chrono::Utc;
use omni_core::models::session::Session;
use omni_core::OmniError;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_session(
    pool: &PgPool,
    metadata: serde_json::Value,
) -> Result<Session, OmniError> {
    let session = Session::new(metadata);

    sqlx::query(
        r#"
        INSERT INTO studio_sessions
            (id, session_token, created_at, last_activity, generations_count, metadata)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(session.id)
    .bind(&session.session_token)
    .bind(session.created_at)
    .bind(session.last_activity)
    .bind(session.generations_count)
    .bind(&session.metadata)
    .execute(pool)
    .await?;

    tracing::info!(session_id = %session.id, "created session");

    Ok(session)
}

pub async fn get_session(pool: &PgPool, id: Uuid) -> Result<Session, OmniError> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, session_token, created_at, last_activity, generations_count, metadata
        FROM studio_sessions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| OmniError::NotFound("Session".to_string()))
}

/// Fire-and-forget usage accounting after a completed generation.
///
/// Never fails the caller: an unparseable id, a missing session, or a
/// database error all reduce to a no-op. The weak session reference on
/// generation records means any of these are legitimate states.
pub async fn record_generation(pool: &PgPool, session_id: &str) {
    let Ok(id) = Uuid::parse_str(session_id) else {
        tracing::debug!(session_id, "accounting skipped: not a session id");
        return;
    };

    let updated = sqlx::query(
        r#"
        UPDATE studio_sessions
        SET generations_count = generations_count + 1, last_activity = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .execute(pool)
    .await;

    match updated {
        Ok(res) if res.rows_affected() == 0 => {
            tracing::debug!(session_id = %id, "accounting skipped: unknown session");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(session_id = %id, error = %e, "session accounting update failed");
        }
    }
}
