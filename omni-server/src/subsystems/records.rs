use std::collections::BTreeMap;

use omni_core::models::generation::Generation;
use omni_core::OmniError;
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, session_id, module_type, prompt, parameters, status,
           result, error_message, created_at, completed_at, processing_time
    FROM generations
"#;

pub async fn insert(pool: &PgPool, generation: &Generation) -> Result<(), OmniError> {
    sqlx::query(
        r#"
        INSERT INTO generations
            (id, session_id, module_type, prompt, parameters, status,
             result, error_message, created_at, completed_at, processing_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(generation.id)
    .bind(&generation.session_id)
    .bind(generation.module_type.as_str())
    .bind(&generation.prompt)
    .bind(&generation.parameters)
    .bind(generation.status.as_str())
    .bind(&generation.result)
    .bind(&generation.error_message)
    .bind(generation.created_at)
    .bind(generation.completed_at)
    .bind(generation.processing_time)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite the lifecycle fields of an existing record. The identity fields
/// (module type, prompt, parameters, session reference) never change after
/// insert.
pub async fn update(pool: &PgPool, generation: &Generation) -> Result<(), OmniError> {
    sqlx::query(
        r#"
        UPDATE generations
        SET status = $2, result = $3, error_message = $4,
            completed_at = $5, processing_time = $6
        WHERE id = $1
        "#,
    )
    .bind(generation.id)
    .bind(generation.status.as_str())
    .bind(&generation.result)
    .bind(&generation.error_message)
    .bind(generation.completed_at)
    .bind(generation.processing_time)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Generation, OmniError> {
    sqlx::query_as::<_, Generation>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| OmniError::NotFound("Generation".to_string()))
}

/// Records linked to a session, newest first.
pub async fn list_by_session(
    pool: &PgPool,
    session_id: &str,
    limit: i64,
) -> Result<Vec<Generation>, OmniError> {
    let rows = sqlx::query_as::<_, Generation>(&format!(
        "{SELECT_COLUMNS} WHERE session_id = $1 ORDER BY created_at DESC LIMIT $2"
    ))
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count(pool: &PgPool) -> Result<i64, OmniError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM generations")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Generation counts grouped by module type.
pub async fn aggregate_by_module(pool: &PgPool) -> Result<BTreeMap<String, i64>, OmniError> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT module_type, COUNT(*) FROM generations GROUP BY module_type")
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().collect())
}
