//! Patient repository for SQLite operations
//!
//! `date_of_birth` is stored as unix milliseconds.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::executor::SqliteEntity;
use crate::data::types::{PatientData, PatientPatch, PatientRow};

fn provider_ref(provider_id: Option<i64>) -> String {
    match provider_id {
        Some(id) => format!("provider {} does not exist", id),
        None => "provider does not exist".to_string(),
    }
}

/// Insert a patient and return the stored row
pub async fn create_patient(
    pool: &SqlitePool,
    data: &PatientData,
) -> Result<PatientRow, SqliteError> {
    let result = sqlx::query(
        "INSERT INTO patient (name, date_of_birth, sex, provider_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&data.name)
    .bind(data.date_of_birth.timestamp_millis())
    .bind(data.sex.as_str())
    .bind(data.provider_id)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::from_write(e, &provider_ref(data.provider_id)))?;

    get_patient(pool, result.last_insert_rowid())
        .await?
        .ok_or(SqliteError::Database(sqlx::Error::RowNotFound))
}

pub async fn get_patient(pool: &SqlitePool, id: i64) -> Result<Option<PatientRow>, SqliteError> {
    let row = sqlx::query_as::<_, <PatientRow as SqliteEntity>::Record>(
        "SELECT id, name, date_of_birth, sex, provider_id FROM patient WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(PatientRow::from_record).transpose()
}

/// Replace every field; `None` when the patient does not exist
pub async fn update_patient(
    pool: &SqlitePool,
    id: i64,
    data: &PatientData,
) -> Result<Option<PatientRow>, SqliteError> {
    let result = sqlx::query(
        "UPDATE patient SET name = ?, date_of_birth = ?, sex = ?, provider_id = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.date_of_birth.timestamp_millis())
    .bind(data.sex.as_str())
    .bind(data.provider_id)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::from_write(e, &provider_ref(data.provider_id)))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_patient(pool, id).await
}

/// Update only the fields present in `patch`
pub async fn patch_patient(
    pool: &SqlitePool,
    id: i64,
    patch: &PatientPatch,
) -> Result<Option<PatientRow>, SqliteError> {
    let result = sqlx::query(
        r#"UPDATE patient SET
            name = COALESCE(?, name),
            date_of_birth = COALESCE(?, date_of_birth),
            sex = COALESCE(?, sex),
            provider_id = COALESCE(?, provider_id)
        WHERE id = ?"#,
    )
    .bind(&patch.name)
    .bind(patch.date_of_birth.map(|d| d.timestamp_millis()))
    .bind(patch.sex.map(|s| s.as_str()))
    .bind(patch.provider_id)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::from_write(e, &provider_ref(patch.provider_id)))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_patient(pool, id).await
}

pub async fn delete_patient(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM patient WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
