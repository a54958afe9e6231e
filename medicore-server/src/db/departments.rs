//! Department lookup resolution
//!
//! Departments are lookup rows created lazily the first time an
//! appointment (or update) references an unknown category key. The
//! find-then-create gap of the naive implementation is closed with an
//! atomic upsert against the unique key column.

use super::models::Department;
use database_layer::{DatabaseError, DatabasePool, DatabaseResult};
use tracing::debug;
use uuid::Uuid;

pub struct DepartmentRepository {
    pool: DatabasePool,
}

impl DepartmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Resolve a category key to its unique department row, creating the
    /// row if absent.
    ///
    /// Single round trip: `ON CONFLICT (type) DO UPDATE` returns the
    /// existing row instead of inserting a duplicate, so two concurrent
    /// resolves of a brand-new key converge on one row. May write on what
    /// looks like a read; callers hold a valid foreign-key target when
    /// this returns.
    pub async fn resolve(&self, department_type: &str) -> DatabaseResult<Department> {
        let key = department_type.trim();
        if key.is_empty() {
            return Err(DatabaseError::QueryFailed(
                "department type must not be empty".to_string(),
            ));
        }

        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (id, type, name, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (type) DO UPDATE SET type = EXCLUDED.type
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key)
        .bind(display_name(key))
        .fetch_one(self.pool.pool())
        .await?;

        debug!(department_type = key, department_id = %department.id, "Department resolved");
        Ok(department)
    }

    /// List all departments, oldest first
    pub async fn list(&self) -> DatabaseResult<Vec<Department>> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY created_at ASC")
                .fetch_all(self.pool.pool())
                .await?;
        Ok(departments)
    }
}

/// Display name derived deterministically from the category key
pub fn display_name(department_type: &str) -> String {
    format!("{} Department", department_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_derives_from_key() {
        assert_eq!(display_name("CARDIOLOGY"), "CARDIOLOGY Department");
    }

    #[test]
    fn display_name_keeps_key_casing() {
        assert_eq!(display_name("IcU"), "IcU Department");
    }
}
