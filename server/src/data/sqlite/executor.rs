//! QueryExecutor implementation for SQLite
//!
//! Rows are fetched as tuples in `EntityDef::columns` order and mapped into
//! entity rows, the same way repositories decode their queries.

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::Sqlite;
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};

use super::{SqliteError, SqliteService};
use crate::data::criteria::{CompiledQuery, PageRequest, SortOrder, SqlValue};
use crate::data::traits::{Page, QueryExecutor};
use crate::data::types::{HospitalRow, PatientRow, ProviderRow, Sex};

/// An entity row decodable from a root-column tuple
pub trait SqliteEntity: Sized + Send + Unpin {
    type Record: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin;

    fn from_record(record: Self::Record) -> Result<Self, SqliteError>;
}

impl SqliteEntity for HospitalRow {
    type Record = (i64, String, Option<String>);

    fn from_record((id, name, description): Self::Record) -> Result<Self, SqliteError> {
        Ok(Self {
            id,
            name,
            description,
        })
    }
}

impl SqliteEntity for ProviderRow {
    type Record = (i64, String, Option<String>, Option<i64>);

    fn from_record((id, name, specialty, hospital_id): Self::Record) -> Result<Self, SqliteError> {
        Ok(Self {
            id,
            name,
            specialty,
            hospital_id,
        })
    }
}

impl SqliteEntity for PatientRow {
    type Record = (i64, String, i64, String, Option<i64>);

    fn from_record(
        (id, name, date_of_birth, sex, provider_id): Self::Record,
    ) -> Result<Self, SqliteError> {
        let date_of_birth =
            DateTime::from_timestamp_millis(date_of_birth).ok_or_else(|| SqliteError::Decode {
                entity: "Patient",
                id,
                reason: format!("timestamp {} out of range", date_of_birth),
            })?;
        let sex = Sex::parse(&sex).ok_or_else(|| SqliteError::Decode {
            entity: "Patient",
            id,
            reason: format!("unknown sex '{}'", sex),
        })?;
        Ok(Self {
            id,
            name,
            date_of_birth,
            sex,
            provider_id,
        })
    }
}

/// Bind compiled parameters in placeholder order
pub fn bind_values<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    values: &[SqlValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in values {
        query = match value {
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Bool(v) => query.bind(*v),
        };
    }
    query
}

#[async_trait]
impl<E> QueryExecutor<E> for SqliteService
where
    E: SqliteEntity + 'static,
{
    async fn find_all(
        &self,
        query: &CompiledQuery,
        sort: &[SortOrder],
    ) -> Result<Vec<E>, SqliteError> {
        let sql = query.select_sql(sort, None);
        tracing::trace!(%sql, "find_all");
        let records = bind_values(sqlx::query_as::<_, E::Record>(&sql), query.params())
            .fetch_all(self.pool())
            .await?;
        records.into_iter().map(E::from_record).collect()
    }

    async fn find_page(
        &self,
        query: &CompiledQuery,
        page: &PageRequest,
    ) -> Result<Page<E>, SqliteError> {
        let total = <Self as QueryExecutor<E>>::count(self, query).await?;

        let content = if page.offset() >= total {
            Vec::new()
        } else {
            let sql = query.select_sql(&page.sort, Some((page.size, page.offset())));
            tracing::trace!(%sql, "find_page");
            bind_values(sqlx::query_as::<_, E::Record>(&sql), query.params())
                .fetch_all(self.pool())
                .await?
                .into_iter()
                .map(E::from_record)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Page {
            content,
            total,
            page: page.page,
            size: page.size,
        })
    }

    async fn count(&self, query: &CompiledQuery) -> Result<u64, SqliteError> {
        let sql = query.count_sql();
        tracing::trace!(%sql, "count");
        let (total,): (i64,) = bind_values(sqlx::query_as(&sql), query.params())
            .fetch_one(self.pool())
            .await?;
        Ok(total.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_record_decodes() {
        let row = PatientRow::from_record((
            3,
            "Ann".to_string(),
            86_400_500,
            "FEMALE".to_string(),
            None,
        ))
        .unwrap();
        assert_eq!(row.sex, Sex::Female);
        assert_eq!(row.date_of_birth.timestamp_millis(), 86_400_500);
    }

    #[test]
    fn test_patient_record_rejects_unknown_sex() {
        let err = PatientRow::from_record((3, "Ann".to_string(), 0, "OTHER".to_string(), Some(1)))
            .unwrap_err();
        assert!(matches!(err, SqliteError::Decode { id: 3, .. }));
    }
}
