//! Criteria query service
//!
//! Compiles a criteria and hands the result to a [`QueryExecutor`]. One
//! service serves every entity type the executor can decode.

use std::sync::Arc;

use crate::data::criteria::{
    Criteria, DedupMode, EntityDef, PageRequest, QueryCompiler, SortOrder, compile,
};
use crate::data::sqlite::SqliteError;
use crate::data::traits::{Page, QueryExecutor};
use crate::utils::string::single_line;

pub struct QueryService<X> {
    executor: Arc<X>,
}

impl<X> Clone for QueryService<X> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<X: Send + Sync> QueryService<X> {
    pub fn new(executor: Arc<X>) -> Self {
        Self { executor }
    }

    /// Every entity matching `criteria`
    pub async fn find_by_criteria<C>(
        &self,
        criteria: &C,
        sort: &[SortOrder],
    ) -> Result<Vec<C::Entity>, SqliteError>
    where
        C: Criteria,
        C::Entity: Send,
        X: QueryExecutor<C::Entity>,
    {
        tracing::debug!(criteria = %single_line(&criteria.to_string()), "find by criteria");
        let query = compile(criteria);
        self.executor.find_all(&query, sort).await
    }

    /// One page of entities matching `criteria`
    pub async fn find_by_criteria_paged<C>(
        &self,
        criteria: &C,
        page: &PageRequest,
    ) -> Result<Page<C::Entity>, SqliteError>
    where
        C: Criteria,
        C::Entity: Send,
        X: QueryExecutor<C::Entity>,
    {
        tracing::debug!(
            criteria = %single_line(&criteria.to_string()),
            page = page.page,
            size = page.size,
            "find by criteria"
        );
        let query = compile(criteria);
        self.executor.find_page(&query, page).await
    }

    /// One page of every `entity` row, without filtering
    pub async fn find_all_paged<E>(
        &self,
        entity: &'static EntityDef,
        page: &PageRequest,
    ) -> Result<Page<E>, SqliteError>
    where
        E: Send,
        X: QueryExecutor<E>,
    {
        tracing::debug!(entity = entity.name, page = page.page, size = page.size, "find all");
        let query = QueryCompiler::new(entity, DedupMode::All).finish();
        self.executor.find_page(&query, page).await
    }

    /// Number of entities matching `criteria`
    pub async fn count_by_criteria<C>(&self, criteria: &C) -> Result<u64, SqliteError>
    where
        C: Criteria,
        C::Entity: Send,
        X: QueryExecutor<C::Entity>,
    {
        tracing::debug!(criteria = %single_line(&criteria.to_string()), "count by criteria");
        let query = compile(criteria);
        self.executor.count(&query).await
    }
}
