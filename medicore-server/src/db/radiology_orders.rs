//! Radiology order lifecycle: create, read, update, soft delete

use super::models::{Doctor, Patient};
use crate::utils::query_builder::PaginatedQuery;
use chrono::{DateTime, Utc};
use database_layer::{DatabasePool, DatabaseResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Radiology order row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct RadiologyOrder {
    pub id: Uuid,
    /// External identifier, assigned once at creation, immutable
    pub order_number: String,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub study_name: String,
    /// Imaging modality, e.g. `XRAY`, `CT`, `MRI`, `ULTRASOUND`
    pub modality: Option<String>,
    pub status: String,
    pub priority: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Radiology order joined with its direct relations
#[derive(Debug, Serialize, ToSchema)]
pub struct RadiologyOrderWithRelations {
    #[serde(flatten)]
    pub order: RadiologyOrder,
    pub patient: Option<Patient>,
    pub doctor: Option<Doctor>,
}

/// Fields for a new radiology order, already validated
#[derive(Debug)]
pub struct NewRadiologyOrder {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub study_name: String,
    pub modality: Option<String>,
    pub status: String,
    pub priority: String,
    pub notes: Option<String>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Default)]
pub struct RadiologyOrderChanges {
    pub doctor_id: Option<Uuid>,
    pub study_name: Option<String>,
    pub modality: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

/// List filters; all optional
#[derive(Debug, Default)]
pub struct RadiologyOrderFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<String>,
}

pub struct RadiologyOrderRepository {
    pool: DatabasePool,
}

impl RadiologyOrderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create a radiology order and return it joined with direct relations
    pub async fn create(&self, new: NewRadiologyOrder) -> DatabaseResult<RadiologyOrderWithRelations> {
        let order = sqlx::query_as::<_, RadiologyOrder>(
            r#"
            INSERT INTO radiology_orders (
                id, order_number, patient_id, doctor_id, appointment_id,
                study_name, modality, status, priority, notes,
                is_active, is_deleted, deleted_at, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                true, false, NULL, NOW(), NOW()
            ) RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(radiology_order_number())
        .bind(new.patient_id)
        .bind(new.doctor_id)
        .bind(new.appointment_id)
        .bind(&new.study_name)
        .bind(&new.modality)
        .bind(&new.status)
        .bind(&new.priority)
        .bind(&new.notes)
        .fetch_one(self.pool.pool())
        .await?;

        self.with_relations(order).await
    }

    /// Fetch one radiology order with relations; soft-deleted rows stay
    /// reachable by id
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<RadiologyOrderWithRelations>> {
        let order =
            sqlx::query_as::<_, RadiologyOrder>("SELECT * FROM radiology_orders WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.pool())
                .await?;

        match order {
            Some(order) => Ok(Some(self.with_relations(order).await?)),
            None => Ok(None),
        }
    }

    /// List non-deleted radiology orders, most recent first
    pub async fn list(
        &self,
        filter: &RadiologyOrderFilter,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> DatabaseResult<(Vec<RadiologyOrderWithRelations>, i64)> {
        let pool = self.pool.pool();

        let mut query =
            PaginatedQuery::new("SELECT * FROM radiology_orders WHERE is_deleted = false");
        query
            .filter_eq("patient_id", filter.patient_id)
            .filter_eq("status", filter.status.clone())
            .order_by_created_desc()
            .paginate(page, page_size);
        let orders: Vec<RadiologyOrder> = query.build_query_as().fetch_all(pool).await?;

        let total_count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM radiology_orders
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
            .map(|order| RadiologyOrderWithRelations {
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
        changes: RadiologyOrderChanges,
    ) -> DatabaseResult<Option<RadiologyOrderWithRelations>> {
        let updated = sqlx::query_as::<_, RadiologyOrder>(
            r#"
            UPDATE radiology_orders SET
                doctor_id = COALESCE($1, doctor_id),
                study_name = COALESCE($2, study_name),
                modality = COALESCE($3, modality),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                notes = COALESCE($6, notes),
                updated_at = NOW()
            WHERE id = $7 AND is_deleted = false
            RETURNING *
            "#,
        )
        .bind(changes.doctor_id)
        .bind(changes.study_name)
        .bind(changes.modality)
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
    pub async fn soft_delete(&self, id: Uuid) -> DatabaseResult<Option<RadiologyOrder>> {
        let deleted = sqlx::query_as::<_, RadiologyOrder>(
            r#"
            UPDATE radiology_orders
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

    async fn with_relations(
        &self,
        order: RadiologyOrder,
    ) -> DatabaseResult<RadiologyOrderWithRelations> {
        let pool = self.pool.pool();
        let patient = Patient::by_id(pool, order.patient_id).await?;
        let doctor = match order.doctor_id {
            Some(doctor_id) => Doctor::by_id(pool, doctor_id).await?,
            None => None,
        };
        Ok(RadiologyOrderWithRelations {
            order,
            patient,
            doctor,
        })
    }
}

/// Generate the external radiology order identifier
pub fn radiology_order_number() -> String {
    format!("RAD-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radiology_order_numbers_carry_prefix() {
        assert!(radiology_order_number().starts_with("RAD-"));
    }
}
