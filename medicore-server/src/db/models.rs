//! Shared relation rows joined into entity responses
//!
//! Patients, doctors and medicines are pass-through collaborators: they
//! are referenced by foreign key and surfaced inside entity responses,
//! but have no mutation surface in this server.

use database_layer::DatabaseResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Hospital department, the lazily-created lookup row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Department {
    pub id: Uuid,
    /// Category key, e.g. `CARDIOLOGY`; unique across rows
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub department_type: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Patient identity row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Doctor identity row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Medicine catalog row referenced by prescription items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub(crate) async fn by_id(pool: &PgPool, id: Uuid) -> DatabaseResult<Option<Patient>> {
        let row = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub(crate) async fn by_ids(pool: &PgPool, ids: &[Uuid]) -> DatabaseResult<HashMap<Uuid, Patient>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}

impl Doctor {
    pub(crate) async fn by_id(pool: &PgPool, id: Uuid) -> DatabaseResult<Option<Doctor>> {
        let row = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub(crate) async fn by_ids(pool: &PgPool, ids: &[Uuid]) -> DatabaseResult<HashMap<Uuid, Doctor>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}

impl Medicine {
    pub(crate) async fn by_ids(pool: &PgPool, ids: &[Uuid]) -> DatabaseResult<HashMap<Uuid, Medicine>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, Medicine>("SELECT * FROM medicines WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}

impl Department {
    pub(crate) async fn by_id(pool: &PgPool, id: Uuid) -> DatabaseResult<Option<Department>> {
        let row = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub(crate) async fn by_ids(pool: &PgPool, ids: &[Uuid]) -> DatabaseResult<HashMap<Uuid, Department>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }
}
