//! Provider repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::executor::SqliteEntity;
use crate::data::types::{ProviderData, ProviderPatch, ProviderRow};

fn hospital_ref(hospital_id: Option<i64>) -> String {
    match hospital_id {
        Some(id) => format!("hospital {} does not exist", id),
        None => "hospital does not exist".to_string(),
    }
}

/// Insert a provider and return it with its generated id
pub async fn create_provider(
    pool: &SqlitePool,
    data: &ProviderData,
) -> Result<ProviderRow, SqliteError> {
    let result =
        sqlx::query("INSERT INTO provider (name, specialty, hospital_id) VALUES (?, ?, ?)")
            .bind(&data.name)
            .bind(&data.specialty)
            .bind(data.hospital_id)
            .execute(pool)
            .await
            .map_err(|e| SqliteError::from_write(e, &hospital_ref(data.hospital_id)))?;

    Ok(ProviderRow {
        id: result.last_insert_rowid(),
        name: data.name.clone(),
        specialty: data.specialty.clone(),
        hospital_id: data.hospital_id,
    })
}

pub async fn get_provider(pool: &SqlitePool, id: i64) -> Result<Option<ProviderRow>, SqliteError> {
    let row = sqlx::query_as::<_, <ProviderRow as SqliteEntity>::Record>(
        "SELECT id, name, specialty, hospital_id FROM provider WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(ProviderRow::from_record).transpose()
}

/// Replace every field; `None` when the provider does not exist
pub async fn update_provider(
    pool: &SqlitePool,
    id: i64,
    data: &ProviderData,
) -> Result<Option<ProviderRow>, SqliteError> {
    let result =
        sqlx::query("UPDATE provider SET name = ?, specialty = ?, hospital_id = ? WHERE id = ?")
            .bind(&data.name)
            .bind(&data.specialty)
            .bind(data.hospital_id)
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| SqliteError::from_write(e, &hospital_ref(data.hospital_id)))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_provider(pool, id).await
}

/// Update only the fields present in `patch`
pub async fn patch_provider(
    pool: &SqlitePool,
    id: i64,
    patch: &ProviderPatch,
) -> Result<Option<ProviderRow>, SqliteError> {
    let result = sqlx::query(
        r#"UPDATE provider SET
            name = COALESCE(?, name),
            specialty = COALESCE(?, specialty),
            hospital_id = COALESCE(?, hospital_id)
        WHERE id = ?"#,
    )
    .bind(&patch.name)
    .bind(&patch.specialty)
    .bind(patch.hospital_id)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::from_write(e, &hospital_ref(patch.hospital_id)))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_provider(pool, id).await
}

/// Delete a provider; its patients keep existing without one
pub async fn delete_provider(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM provider WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
