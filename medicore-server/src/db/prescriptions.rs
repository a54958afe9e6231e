//! Prescription lifecycle: transactional create, read, hard delete
//!
//! A prescription owns its line-items: both are written in one
//! transaction at creation and removed in one transaction at deletion,
//! so the parent never exists without its items and vice versa.

use super::models::{Doctor, Medicine, Patient};
use chrono::{DateTime, Utc};
use database_layer::{DatabaseError, DatabasePool, DatabaseResult};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Prescription row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Prescription {
    pub id: Uuid,
    /// Opaque public identifier, assigned once at creation, immutable
    pub public_id: Uuid,
    /// Optional human-facing number supplied by the caller
    pub prescription_number: Option<String>,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line-item row, owned exclusively by its prescription
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct PrescriptionItem {
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub medicine_id: Uuid,
    pub dosage: Option<String>,
    pub quantity: Option<i32>,
    pub duration_days: Option<i32>,
    pub instructions: Option<String>,
}

/// Line-item joined with its medicine
#[derive(Debug, Serialize, ToSchema)]
pub struct PrescriptionItemWithMedicine {
    #[serde(flatten)]
    pub item: PrescriptionItem,
    pub medicine: Option<Medicine>,
}

/// Prescription joined with patient, doctor, and items
#[derive(Debug, Serialize, ToSchema)]
pub struct PrescriptionWithRelations {
    #[serde(flatten)]
    pub prescription: Prescription,
    pub patient: Option<Patient>,
    pub doctor: Option<Doctor>,
    pub items: Vec<PrescriptionItemWithMedicine>,
}

/// Fields for a new prescription, already validated
#[derive(Debug)]
pub struct NewPrescription {
    pub prescription_number: Option<String>,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub notes: Option<String>,
    pub items: Vec<NewPrescriptionItem>,
}

/// Fields for one new line-item
#[derive(Debug)]
pub struct NewPrescriptionItem {
    pub medicine_id: Uuid,
    pub dosage: Option<String>,
    pub quantity: Option<i32>,
    pub duration_days: Option<i32>,
    pub instructions: Option<String>,
}

pub struct PrescriptionRepository {
    pool: DatabasePool,
}

impl PrescriptionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create a prescription with its full item sequence atomically
    ///
    /// The public identifier is generated before the insert. Parent and
    /// items go in one transaction: if any item insert fails the whole
    /// create rolls back.
    pub async fn create(&self, new: NewPrescription) -> DatabaseResult<PrescriptionWithRelations> {
        if new.items.is_empty() {
            return Err(DatabaseError::QueryFailed(
                "prescription requires at least one item".to_string(),
            ));
        }

        let mut tx = self.pool.pool().begin().await?;

        let prescription = sqlx::query_as::<_, Prescription>(
            r#"
            INSERT INTO prescriptions (
                id, public_id, prescription_number, patient_id, doctor_id,
                appointment_id, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Uuid::new_v4())
        .bind(&new.prescription_number)
        .bind(new.patient_id)
        .bind(new.doctor_id)
        .bind(new.appointment_id)
        .bind(&new.notes)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                r#"
                INSERT INTO prescription_items (
                    id, prescription_id, medicine_id, dosage, quantity,
                    duration_days, instructions
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(prescription.id)
            .bind(item.medicine_id)
            .bind(&item.dosage)
            .bind(item.quantity)
            .bind(item.duration_days)
            .bind(&item.instructions)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.with_relations(prescription).await
    }

    /// Fetch one prescription with patient, doctor, and items-with-medicine
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<PrescriptionWithRelations>> {
        let prescription =
            sqlx::query_as::<_, Prescription>("SELECT * FROM prescriptions WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.pool())
                .await?;

        match prescription {
            Some(prescription) => Ok(Some(self.with_relations(prescription).await?)),
            None => Ok(None),
        }
    }

    /// List prescriptions, most recent first, with direct relations
    pub async fn list(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> DatabaseResult<(Vec<PrescriptionWithRelations>, i64)> {
        let pool = self.pool.pool();
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(20).clamp(1, 100);

        let prescriptions = sqlx::query_as::<_, Prescription>(
            "SELECT * FROM prescriptions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page_size as i64)
        .bind(((page - 1) * page_size) as i64)
        .fetch_all(pool)
        .await?;

        let total_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM prescriptions")
            .fetch_one(pool)
            .await?;

        let prescription_ids: Vec<Uuid> = prescriptions.iter().map(|p| p.id).collect();
        let patient_ids: Vec<Uuid> = prescriptions.iter().map(|p| p.patient_id).unique().collect();
        let doctor_ids: Vec<Uuid> = prescriptions.iter().map(|p| p.doctor_id).unique().collect();

        let patients = Patient::by_ids(pool, &patient_ids).await?;
        let doctors = Doctor::by_ids(pool, &doctor_ids).await?;
        let mut items = self.items_for(&prescription_ids).await?;

        let joined = prescriptions
            .into_iter()
            .map(|prescription| PrescriptionWithRelations {
                patient: patients.get(&prescription.patient_id).cloned(),
                doctor: doctors.get(&prescription.doctor_id).cloned(),
                items: items.remove(&prescription.id).unwrap_or_default(),
                prescription,
            })
            .collect();

        Ok((joined, total_count))
    }

    /// Hard delete: items first, then the parent row, in one transaction
    ///
    /// Returns `false` when the id is unknown (nothing is removed).
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tx = self.pool.pool().begin().await?;

        sqlx::query("DELETE FROM prescription_items WHERE prescription_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query("DELETE FROM prescriptions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn with_relations(
        &self,
        prescription: Prescription,
    ) -> DatabaseResult<PrescriptionWithRelations> {
        let pool = self.pool.pool();
        let patient = Patient::by_id(pool, prescription.patient_id).await?;
        let doctor = Doctor::by_id(pool, prescription.doctor_id).await?;
        let items = self
            .items_for(&[prescription.id])
            .await?
            .remove(&prescription.id)
            .unwrap_or_default();
        Ok(PrescriptionWithRelations {
            prescription,
            patient,
            doctor,
            items,
        })
    }

    /// Batch-fetch items for a set of prescriptions, each joined with its
    /// medicine, grouped by prescription id
    async fn items_for(
        &self,
        prescription_ids: &[Uuid],
    ) -> DatabaseResult<HashMap<Uuid, Vec<PrescriptionItemWithMedicine>>> {
        if prescription_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let pool = self.pool.pool();

        let items = sqlx::query_as::<_, PrescriptionItem>(
            "SELECT * FROM prescription_items WHERE prescription_id = ANY($1)",
        )
        .bind(prescription_ids)
        .fetch_all(pool)
        .await?;

        let medicine_ids: Vec<Uuid> = items.iter().map(|i| i.medicine_id).unique().collect();
        let medicines = Medicine::by_ids(pool, &medicine_ids).await?;

        let mut grouped: HashMap<Uuid, Vec<PrescriptionItemWithMedicine>> = HashMap::new();
        for item in items {
            let medicine = medicines.get(&item.medicine_id).cloned();
            grouped
                .entry(item.prescription_id)
                .or_default()
                .push(PrescriptionItemWithMedicine { item, medicine });
        }
        Ok(grouped)
    }
}
