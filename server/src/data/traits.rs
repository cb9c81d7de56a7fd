//! Query executor trait
//!
//! The compiled query is backend-neutral SQL; an executor runs it and decodes
//! root rows. All three operations honor the query's distinct flag the same
//! way, so `count` always equals the length of `find_all`.

use async_trait::async_trait;
use serde::Serialize;

use crate::data::criteria::{CompiledQuery, PageRequest, SortOrder};
use crate::data::sqlite::SqliteError;

/// One page of results plus the unpaged match count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<E> {
    pub content: Vec<E>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<E> Page<E> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size as u64)
        }
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64 + 1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn map<U>(self, f: impl FnMut(E) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

/// Runs compiled queries returning rows of `E`
#[async_trait]
pub trait QueryExecutor<E: Send>: Send + Sync {
    /// Every matching row, ordered by `sort` then id
    async fn find_all(
        &self,
        query: &CompiledQuery,
        sort: &[SortOrder],
    ) -> Result<Vec<E>, SqliteError>;

    /// One zero-indexed page plus the total match count
    async fn find_page(
        &self,
        query: &CompiledQuery,
        page: &PageRequest,
    ) -> Result<Page<E>, SqliteError>;

    async fn count(&self, query: &CompiledQuery) -> Result<u64, SqliteError>;
}
