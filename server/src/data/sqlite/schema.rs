//! SQLite schema definitions
//!
//! The DDL is idempotent and applied on every startup. Table metadata used by
//! the criteria compiler lives next to it so both stay in step.

use sqlx::SqlitePool;

use super::error::SqliteError;
use crate::data::criteria::{Cardinality, EntityDef, Relation};

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- 1. Hospitals
-- =============================================================================
CREATE TABLE IF NOT EXISTS hospital (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    description TEXT
);

-- =============================================================================
-- 2. Providers (references hospitals)
-- =============================================================================
CREATE TABLE IF NOT EXISTS provider (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    specialty TEXT,
    hospital_id INTEGER REFERENCES hospital(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_provider_hospital ON provider(hospital_id);

-- =============================================================================
-- 3. Patients (references providers)
-- =============================================================================
CREATE TABLE IF NOT EXISTS patient (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    date_of_birth INTEGER NOT NULL,
    sex TEXT NOT NULL CHECK(sex IN ('MALE', 'FEMALE')),
    provider_id INTEGER REFERENCES provider(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_patient_provider ON patient(provider_id);
"#;

/// Apply the schema inside one transaction
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), SqliteError> {
    let mut tx = pool.begin().await?;
    sqlx::query(SCHEMA).execute(&mut *tx).await?;
    tx.commit().await?;
    tracing::debug!("SQLite schema applied");
    Ok(())
}

// ============================================================================
// Queryable entities
// ============================================================================

pub static HOSPITAL: EntityDef = EntityDef {
    name: "Hospital",
    table: "hospital",
    id_column: "id",
    columns: &["id", "name", "description"],
    sortable: &[("id", "id"), ("name", "name"), ("description", "description")],
};

pub static PROVIDER: EntityDef = EntityDef {
    name: "Provider",
    table: "provider",
    id_column: "id",
    columns: &["id", "name", "specialty", "hospital_id"],
    sortable: &[("id", "id"), ("name", "name"), ("specialty", "specialty")],
};

pub static PATIENT: EntityDef = EntityDef {
    name: "Patient",
    table: "patient",
    id_column: "id",
    columns: &["id", "name", "date_of_birth", "sex", "provider_id"],
    sortable: &[
        ("id", "id"),
        ("name", "name"),
        ("dateOfBirth", "date_of_birth"),
        ("sex", "sex"),
    ],
};

/// Patient -> its provider
pub static PATIENT_PROVIDER: Relation = Relation {
    name: "provider",
    target: &PROVIDER,
    local_column: "provider_id",
    remote_column: "id",
    cardinality: Cardinality::ManyToOne,
};

/// Provider -> its patients
pub static PROVIDER_PATIENTS: Relation = Relation {
    name: "patients",
    target: &PATIENT,
    local_column: "id",
    remote_column: "provider_id",
    cardinality: Cardinality::OneToMany,
};

/// Provider -> its hospital
pub static PROVIDER_HOSPITAL: Relation = Relation {
    name: "hospital",
    target: &HOSPITAL,
    local_column: "hospital_id",
    remote_column: "id",
    cardinality: Cardinality::ManyToOne,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_contains_required_tables() {
        for table in ["hospital", "provider", "patient"] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                "missing table {}",
                table
            );
        }
    }

    #[test]
    fn test_entity_columns_cover_sortable_columns() {
        for entity in [&HOSPITAL, &PROVIDER, &PATIENT] {
            for (_, column) in entity.sortable {
                assert!(entity.columns.contains(column), "{}.{}", entity.name, column);
            }
            assert_eq!(entity.columns[0], entity.id_column);
        }
    }

    #[tokio::test]
    async fn test_apply_schema_is_idempotent() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        apply_schema(&pool).await.unwrap();
        apply_schema(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('hospital', 'provider', 'patient')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 3);
    }
}
