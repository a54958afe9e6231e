//! Lab order lifecycle: create, read, update, soft delete

use super::models::{Doctor, Patient};
use crate::utils::query_builder::PaginatedQuery;
use chrono::{DateTime, Utc};
use database_layer::{DatabasePool, DatabaseResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lab order row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct LabOrder {
    pub id: Uuid,
    /// External identifier, assigned once at creation, immutable
    pub order_number: String,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub test_name: String,
    pub status: String,
    pub priority: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lab order joined with its direct relations
#[derive(Debug, Serialize, ToSchema)]
pub struct LabOrderWithRelations {
    #[serde(flatten)]
    pub order: LabOrder,
    pub patient: Option<Patient>,
    pub doctor: Option<Doctor>,
}

/// Fields for a new lab order, already validated
#[derive(Debug)]
pub struct NewLabOrder {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub test_name: String,
    pub status: String,
    pub priority: String,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Default)]
pub struct LabOrderChanges {
    pub doctor_id: Option<Uuid>,
    pub test_name: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

/// List filters; all optional
#[derive(Debug, Default)]
pub struct LabOrderFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<String>,
}

pub struct LabOrderRepository {
    pool: DatabasePool,
}

impl LabOrderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create a lab order and return it joined with direct relations
    pub async fn create(&self, new: NewLabOrder) -> DatabaseResult<LabOrderWithRelations> {
        let order = sqlx::query_as::<_, LabOrder>(
            r#"
            INSERT INTO lab_orders (
                id, order_number, patient_id, doctor_id, appointment_id,
                test_name, status, priority, notes,
                is_active, is_deleted, deleted_at, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9,
                true, false, NULL, NOW(), NOW()
            ) RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(lab_order_number())
        .bind(new.patient_id)
        .bind(new.doctor_id)
        .bind(new.appointment_id)
        .bind(&new.test_name)
        .bind(&new.status)
        .bind(&new.priority)
        .bind(&new.notes)
        .fetch_one(self.pool.pool())
        .await?;

        self.with_relations(order).await
    }

    /// Fetch one lab order with relations; soft-deleted rows stay
    /// reachable by id
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<LabOrderWithRelations>> {
        let order = sqlx::query_as::<_, LabOrder>("SELECT * FROM lab_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        match order {
            Some(order) => Ok(Some(self.with_relations(order).await?)),
            None => Ok(None),
        }
    }

    /// List non-deleted lab orders, most recent first
    pub async fn list(
        &self,
        filter: &LabOrderFilter,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> DatabaseResult<(Vec<LabOrderWithRelations>, i64)> {
        let pool = self.pool.pool();

        let mut query = PaginatedQuery::new("SELECT * FROM lab_orders WHERE is_deleted = false");
        query
            .filter_eq("patient_id", filter.patient_id)
            .filter_eq("status", filter.status.clone())
            .order_by_created_desc()
            .paginate(page, page_size);
        let orders: Vec<LabOrder> = query.build_query_as().fetch_all(pool).await?;

        let total_count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM lab_orders
               WHERE is_deleted = false
                 AND ($1::uuid IS NULL OR patient_id = $1)
                 AND ($2::text IS NULL OR status = $2)"#,
        )
        .bind(filter.patient_id)
        .bind(filter.status.as_deref())
        .fetch_one(pool)
        .await?;

        let patient_ids: Vec<Uuid> = orders.iter().map(|o| o.patient_id).unique().collect();
        let doctor_ids: Vec<Uuid> = orders.iter().filter_map(|o| o.doctor_id).unique().collect();
        let patients = Patient::by_ids(pool, &patient_ids).await?;
        let doctors = Doctor::by_ids(pool, &doctor_ids).await?;

        let joined = orders
            .into_iter()
            .map(|order| LabOrderWithRelations {
                patient: patients.get(&order.patient_id).cloned(),
                doctor: order.doctor_id.and_then(|doctor_id| doctors.get(&doctor_id).cloned()),
                order,
            })
            .collect();

        Ok((joined, total_count))
    }

    /// Apply a partial update; `None` when the id is unknown or deleted
    pub async fn update(
        &self,
        id: Uuid,
        changes: LabOrderChanges,
    ) -> DatabaseResult<Option<LabOrderWithRelations>> {
        let updated = sqlx::query_as::<_, LabOrder>(
            r#"
            UPDATE lab_orders SET
                doctor_id = COALESCE($1, doctor_id),
                test_name = COALESCE($2, test_name),
                status = COALESCE($3, status),
                priority = COALESCE($4, priority),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE id = $6 AND is_deleted = false
            RETURNING *
            "#,
        )
        .bind(changes.doctor_id)
        .bind(changes.test_name)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.notes)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        match updated {
            Some(order) => Ok(Some(self.with_relations(order).await?)),
            None => Ok(None),
        }
    }

    /// Soft delete: flags flipped, deletion stamped, row retained
    pub async fn soft_delete(&self, id: Uuid) -> DatabaseResult<Option<LabOrder>> {
        let deleted = sqlx::query_as::<_, LabOrder>(
            r#"
            UPDATE lab_orders
            SET is_deleted = true, is_active = false, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND is_deleted = false
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(deleted)
    }

    async fn with_relations(&self, order: LabOrder) -> DatabaseResult<LabOrderWithRelations> {
        let pool = self.pool.pool();
        let patient = Patient::by_id(pool, order.patient_id).await?;
        let doctor = match order.doctor_id {
            Some(doctor_id) => Doctor::by_id(pool, doctor_id).await?,
            None => None,
        };
        Ok(LabOrderWithRelations {
            order,
            patient,
            doctor,
        })
    }
}

/// Generate the external lab order identifier
pub fn lab_order_number() -> String {
    format!("LAB-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lab_order_numbers_carry_prefix() {
        assert!(lab_order_number().starts_with("LAB-"));
    }
}
