//! Hospital repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::executor::SqliteEntity;
use crate::data::types::{HospitalData, HospitalPatch, HospitalRow};

/// Insert a hospital and return it with its generated id
pub async fn create_hospital(
    pool: &SqlitePool,
    data: &HospitalData,
) -> Result<HospitalRow, SqliteError> {
    let result = sqlx::query("INSERT INTO hospital (name, description) VALUES (?, ?)")
        .bind(&data.name)
        .bind(&data.description)
        .execute(pool)
        .await?;

    Ok(HospitalRow {
        id: result.last_insert_rowid(),
        name: data.name.clone(),
        description: data.description.clone(),
    })
}

pub async fn get_hospital(pool: &SqlitePool, id: i64) -> Result<Option<HospitalRow>, SqliteError> {
    let row = sqlx::query_as::<_, <HospitalRow as SqliteEntity>::Record>(
        "SELECT id, name, description FROM hospital WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(HospitalRow::from_record).transpose()
}

/// Replace every field; `None` when the hospital does not exist
pub async fn update_hospital(
    pool: &SqlitePool,
    id: i64,
    data: &HospitalData,
) -> Result<Option<HospitalRow>, SqliteError> {
    let result = sqlx::query("UPDATE hospital SET name = ?, description = ? WHERE id = ?")
        .bind(&data.name)
        .bind(&data.description)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_hospital(pool, id).await
}

/// Update only the fields present in `patch`
pub async fn patch_hospital(
    pool: &SqlitePool,
    id: i64,
    patch: &HospitalPatch,
) -> Result<Option<HospitalRow>, SqliteError> {
    let result = sqlx::query(
        "UPDATE hospital SET name = COALESCE(?, name), description = COALESCE(?, description) WHERE id = ?",
    )
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_hospital(pool, id).await
}

/// Delete a hospital; its providers keep existing without one
pub async fn delete_hospital(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM hospital WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
