//! Appointment lifecycle: create, read, update, soft delete
//!
//! Appointments carry a generated external identifier
//! (`APT-{uuid}`), reference a resolved department, and are removed via
//! soft delete so history and foreign keys survive.

use super::models::{Department, Doctor, Patient};
use super::prescriptions::Prescription;
use super::{lab_orders::LabOrder, radiology_orders::RadiologyOrder};
use crate::utils::query_builder::PaginatedQuery;
use chrono::{DateTime, Utc};
use database_layer::{DatabasePool, DatabaseResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Appointment row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    /// External identifier, assigned once at creation, immutable
    pub appointment_number: String,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub department_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_mins: i32,
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment joined with its direct relations
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentWithRelations {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: Option<Patient>,
    pub doctor: Option<Doctor>,
    pub department: Option<Department>,
}

/// Appointment joined with the extended relation set (by-id reads only;
/// listings stay at direct relations to bound payload size)
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentDetail {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient: Option<Patient>,
    pub doctor: Option<Doctor>,
    pub department: Option<Department>,
    pub prescriptions: Vec<Prescription>,
    pub lab_orders: Vec<LabOrder>,
    pub radiology_orders: Vec<RadiologyOrder>,
}

/// Fields for a new appointment, already validated and resolved
#[derive(Debug)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub department_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_mins: i32,
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Default)]
pub struct AppointmentChanges {
    pub doctor_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_mins: Option<i32>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

/// List filters; all optional
#[derive(Debug, Default)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub status: Option<String>,
}

pub struct AppointmentRepository {
    pool: DatabasePool,
}

impl AppointmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create an appointment and return it joined with direct relations
    ///
    /// The external identifier is generated here, before the insert; a
    /// failed insert retried by the caller gets a fresh one.
    pub async fn create(&self, new: NewAppointment) -> DatabaseResult<AppointmentWithRelations> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                id, appointment_number, patient_id, doctor_id, department_id,
                scheduled_at, duration_mins, status, reason, notes, created_by,
                is_active, is_deleted, deleted_at, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                true, false, NULL, NOW(), NOW()
            ) RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(appointment_number())
        .bind(new.patient_id)
        .bind(new.doctor_id)
        .bind(new.department_id)
        .bind(new.scheduled_at)
        .bind(new.duration_mins)
        .bind(&new.status)
        .bind(&new.reason)
        .bind(&new.notes)
        .bind(new.created_by)
        .fetch_one(self.pool.pool())
        .await?;

        self.with_relations(appointment).await
    }

    /// Fetch one appointment with the extended relation set
    ///
    /// Soft-deleted rows stay reachable by id.
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<AppointmentDetail>> {
        let pool = self.pool.pool();
        let Some(appointment) =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        else {
            return Ok(None);
        };

        let patient = Patient::by_id(pool, appointment.patient_id).await?;
        let doctor = match appointment.doctor_id {
            Some(doctor_id) => Doctor::by_id(pool, doctor_id).await?,
            None => None,
        };
        let department = Department::by_id(pool, appointment.department_id).await?;

        let prescriptions = sqlx::query_as::<_, Prescription>(
            "SELECT * FROM prescriptions WHERE appointment_id = $1 ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        let lab_orders = sqlx::query_as::<_, LabOrder>(
            "SELECT * FROM lab_orders WHERE appointment_id = $1 AND is_deleted = false ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        let radiology_orders = sqlx::query_as::<_, RadiologyOrder>(
            "SELECT * FROM radiology_orders WHERE appointment_id = $1 AND is_deleted = false ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(AppointmentDetail {
            appointment,
            patient,
            doctor,
            department,
            prescriptions,
            lab_orders,
            radiology_orders,
        }))
    }

    /// List non-deleted appointments, most recent first, with direct
    /// relations batch-fetched and stitched in memory
    pub async fn list(
        &self,
        filter: &AppointmentFilter,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> DatabaseResult<(Vec<AppointmentWithRelations>, i64)> {
        let pool = self.pool.pool();

        let mut query =
            PaginatedQuery::new("SELECT * FROM appointments WHERE is_deleted = false");
        query
            .filter_eq("patient_id", filter.patient_id)
            .filter_eq("doctor_id", filter.doctor_id)
            .filter_eq("status", filter.status.clone())
            .order_by_created_desc()
            .paginate(page, page_size);
        let appointments: Vec<Appointment> =
            query.build_query_as().fetch_all(pool).await?;

        let total_count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM appointments
               WHERE is_deleted = false
                 AND ($1::uuid IS NULL OR patient_id = $1)
                 AND ($2::uuid IS NULL OR doctor_id = $2)
                 AND ($3::text IS NULL OR status = $3)"#,
        )
        .bind(filter.patient_id)
        .bind(filter.doctor_id)
        .bind(filter.status.as_deref())
        .fetch_one(pool)
        .await?;

        let patient_ids: Vec<Uuid> = appointments.iter().map(|a| a.patient_id).unique().collect();
        let doctor_ids: Vec<Uuid> = appointments
            .iter()
            .filter_map(|a| a.doctor_id)
            .unique()
            .collect();
        let department_ids: Vec<Uuid> =
            appointments.iter().map(|a| a.department_id).unique().collect();

        let patients = Patient::by_ids(pool, &patient_ids).await?;
        let doctors = Doctor::by_ids(pool, &doctor_ids).await?;
        let departments = Department::by_ids(pool, &department_ids).await?;

        let joined = appointments
            .into_iter()
            .map(|appointment| AppointmentWithRelations {
                patient: patients.get(&appointment.patient_id).cloned(),
                doctor: appointment
                    .doctor_id
                    .and_then(|doctor_id| doctors.get(&doctor_id).cloned()),
                department: departments.get(&appointment.department_id).cloned(),
                appointment,
            })
            .collect();

        Ok((joined, total_count))
    }

    /// Apply a partial update and return the row with direct relations;
    /// `None` when the id is unknown or soft-deleted
    pub async fn update(
        &self,
        id: Uuid,
        changes: AppointmentChanges,
    ) -> DatabaseResult<Option<AppointmentWithRelations>> {
        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments SET
                doctor_id = COALESCE($1, doctor_id),
                department_id = COALESCE($2, department_id),
                scheduled_at = COALESCE($3, scheduled_at),
                duration_mins = COALESCE($4, duration_mins),
                status = COALESCE($5, status),
                reason = COALESCE($6, reason),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $8 AND is_deleted = false
            RETURNING *
            "#,
        )
        .bind(changes.doctor_id)
        .bind(changes.department_id)
        .bind(changes.scheduled_at)
        .bind(changes.duration_mins)
        .bind(changes.status)
        .bind(changes.reason)
        .bind(changes.notes)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        match updated {
            Some(appointment) => Ok(Some(self.with_relations(appointment).await?)),
            None => Ok(None),
        }
    }

    /// Soft delete: flags flipped, deletion stamped, row retained
    pub async fn soft_delete(&self, id: Uuid) -> DatabaseResult<Option<Appointment>> {
        let deleted = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
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
        appointment: Appointment,
    ) -> DatabaseResult<AppointmentWithRelations> {
        let pool = self.pool.pool();
        let patient = Patient::by_id(pool, appointment.patient_id).await?;
        let doctor = match appointment.doctor_id {
            Some(doctor_id) => Doctor::by_id(pool, doctor_id).await?,
            None => None,
        };
        let department = Department::by_id(pool, appointment.department_id).await?;
        Ok(AppointmentWithRelations {
            appointment,
            patient,
            doctor,
            department,
        })
    }
}

/// Generate the external appointment identifier
pub fn appointment_number() -> String {
    format!("APT-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn appointment_numbers_carry_prefix() {
        let number = appointment_number();
        assert!(number.starts_with("APT-"));
        assert!(number.len() > "APT-".len());
    }

    #[test]
    fn appointment_numbers_are_unique_across_creates() {
        let numbers: HashSet<String> = (0..100).map(|_| appointment_number()).collect();
        assert_eq!(numbers.len(), 100);
    }
}
