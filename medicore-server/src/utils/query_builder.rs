//! Query builder utilities for consistent SQL query construction
//!
//! Eliminates duplication in list-endpoint SQL across repositories,
//! particularly for optional filters, ordering, and pagination.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{Postgres, QueryBuilder};

/// Paginated query builder for consistent query construction
///
/// ```ignore
/// let mut query = PaginatedQuery::new("SELECT * FROM appointments WHERE is_deleted = false");
/// query
///     .filter_eq("patient_id", params.patient_id)
///     .filter_eq("status", params.status.as_deref())
///     .order_by("created_at", "DESC")
///     .paginate(params.page, params.page_size);
///
/// let rows: Vec<Appointment> = query.build_query_as().fetch_all(pool).await?;
/// ```
pub struct PaginatedQuery<'a> {
    query: QueryBuilder<'a, Postgres>,
    page: u32,
    page_size: u32,
}

impl<'a> PaginatedQuery<'a> {
    /// Create a new paginated query builder
    ///
    /// The base query must already contain a WHERE clause so filters can
    /// append `AND ...` fragments unconditionally.
    pub fn new(base_query: &'static str) -> Self {
        Self {
            query: QueryBuilder::new(base_query),
            page: 1,
            page_size: 20,
        }
    }

    /// Add an equality filter (only if value is Some)
    pub fn filter_eq<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
    {
        if let Some(val) = value {
            self.query.push(format!(" AND {} = ", column));
            self.query.push_bind(val);
        }
        self
    }

    /// Filter for non-deleted records only
    pub fn filter_not_deleted(&mut self) -> &mut Self {
        self.query.push(" AND is_deleted = false");
        self
    }

    /// Add ORDER BY clause
    pub fn order_by(&mut self, column: &str, direction: &str) -> &mut Self {
        self.query.push(format!(" ORDER BY {} {}", column, direction));
        self
    }

    /// Add ORDER BY created_at DESC (common pattern)
    pub fn order_by_created_desc(&mut self) -> &mut Self {
        self.order_by("created_at", "DESC")
    }

    /// Apply pagination
    pub fn paginate(&mut self, page: Option<u32>, page_size: Option<u32>) -> &mut Self {
        self.page = page.unwrap_or(1).max(1);
        self.page_size = page_size.unwrap_or(20).clamp(1, 100);
        let offset = (self.page - 1) * self.page_size;
        self.query.push(" LIMIT ");
        self.query.push_bind(self.page_size as i64);
        self.query.push(" OFFSET ");
        self.query.push_bind(offset as i64);
        self
    }

    /// Build the final query
    pub fn build_query_as<T>(&mut self) -> QueryAs<'_, Postgres, T, PgArguments>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
    {
        self.query.build_query_as()
    }

    /// Get current page
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Get current page size
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_query_builder() {
        let mut query = PaginatedQuery::new("SELECT * FROM appointments WHERE 1=1");
        query
            .filter_eq("status", Some("SCHEDULED"))
            .filter_not_deleted()
            .order_by("created_at", "DESC")
            .paginate(Some(2), Some(10));

        assert_eq!(query.page(), 2);
        assert_eq!(query.page_size(), 10);
    }

    #[test]
    fn test_filter_eq_with_none() {
        let mut query = PaginatedQuery::new("SELECT * FROM appointments WHERE 1=1");
        query.filter_eq("status", None::<String>);
        // No fragment appended when the value is None
        assert_eq!(query.page(), 1);
    }
}
