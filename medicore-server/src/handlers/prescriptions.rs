use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::prescriptions::{
    NewPrescription, NewPrescriptionItem, PrescriptionWithRelations,
};
use crate::db::PrescriptionRepository;
use crate::error::{api_success, api_success_with_meta, ApiError, ApiResponse};
use crate::server::MediCoreServer;
use crate::types::pagination::PaginationParams;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_uuid};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Create Prescription Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePrescriptionRequest {
    /// Optional human-facing number supplied by the caller
    pub prescription_number: Option<String>,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub notes: Option<String>,
    /// At least one item is required
    pub items: Vec<CreatePrescriptionItemRequest>,
}

/// One prescription line-item
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePrescriptionItemRequest {
    pub medicine_id: Uuid,
    pub dosage: Option<String>,
    pub quantity: Option<i32>,
    pub duration_days: Option<i32>,
    pub instructions: Option<String>,
}

impl RequestValidation for CreatePrescriptionRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_uuid!(self.patient_id, "patient_id is required");
        validate_uuid!(self.doctor_id, "doctor_id is required");
        validate_field!(
            self.items,
            !self.items.is_empty(),
            "items must contain at least one entry"
        );

        for item in &self.items {
            validate_uuid!(item.medicine_id, "items[].medicine_id is required");
            if let Some(quantity) = item.quantity {
                validate_field!(quantity, quantity > 0, "items[].quantity must be positive");
            }
            if let Some(duration) = item.duration_days {
                validate_field!(duration, duration > 0, "items[].duration_days must be positive");
            }
        }

        Ok(())
    }
}

/// List Prescriptions Query Parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPrescriptionsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListPrescriptionsParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Hard-delete confirmation body
#[derive(Debug, Serialize, ToSchema)]
pub struct PrescriptionDeleted {
    pub id: Uuid,
    pub deleted: bool,
}

// ============================================================================
// API HANDLERS
// ============================================================================

/// Create a prescription with its items
///
/// Parent and items are written in one transaction; a failure on any
/// item rolls the whole create back.
#[utoipa::path(
    post,
    path = "/api/v1/prescriptions",
    request_body = CreatePrescriptionRequest,
    responses(
        (status = 201, description = "Prescription created successfully", body = PrescriptionWithRelations),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "prescriptions"
)]
pub async fn create_prescription(
    State(server): State<MediCoreServer>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PrescriptionWithRelations>>), ApiError> {
    request.validate()?;

    let items = request
        .items
        .into_iter()
        .map(|item| NewPrescriptionItem {
            medicine_id: item.medicine_id,
            dosage: item.dosage,
            quantity: item.quantity,
            duration_days: item.duration_days,
            instructions: item.instructions,
        })
        .collect();

    let prescription = PrescriptionRepository::new(server.db.clone())
        .create(NewPrescription {
            prescription_number: request.prescription_number,
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            appointment_id: request.appointment_id,
            notes: request.notes,
            items,
        })
        .await?;

    info!(
        public_id = %prescription.prescription.public_id,
        item_count = prescription.items.len(),
        "Prescription created"
    );

    Ok((StatusCode::CREATED, Json(api_success(prescription))))
}

/// List prescriptions
#[utoipa::path(
    get,
    path = "/api/v1/prescriptions",
    params(ListPrescriptionsParams),
    responses(
        (status = 200, description = "Prescriptions retrieved successfully", body = Vec<PrescriptionWithRelations>),
        (status = 500, description = "Internal server error")
    ),
    tag = "prescriptions"
)]
pub async fn list_prescriptions(
    State(server): State<MediCoreServer>,
    Query(params): Query<ListPrescriptionsParams>,
) -> Result<Json<ApiResponse<Vec<PrescriptionWithRelations>>>, ApiError> {
    let pagination = params.pagination();
    let (prescriptions, total_count) = PrescriptionRepository::new(server.db.clone())
        .list(pagination.page, pagination.page_size)
        .await?;

    let metadata = pagination.to_metadata(total_count);
    Ok(Json(api_success_with_meta(prescriptions, metadata)))
}

/// Get a specific prescription
#[utoipa::path(
    get,
    path = "/api/v1/prescriptions/{id}",
    params(("id" = Uuid, Path, description = "Prescription ID")),
    responses(
        (status = 200, description = "Prescription retrieved successfully", body = PrescriptionWithRelations),
        (status = 404, description = "Prescription not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "prescriptions"
)]
pub async fn get_prescription(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PrescriptionWithRelations>>, ApiError> {
    match PrescriptionRepository::new(server.db.clone()).find_by_id(id).await? {
        Some(prescription) => Ok(Json(api_success(prescription))),
        None => Err(ApiError::not_found("prescription")),
    }
}

/// Hard-delete a prescription and its items
#[utoipa::path(
    delete,
    path = "/api/v1/prescriptions/{id}",
    params(("id" = Uuid, Path, description = "Prescription ID")),
    responses(
        (status = 200, description = "Prescription deleted successfully", body = PrescriptionDeleted),
        (status = 404, description = "Prescription not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "prescriptions"
)]
pub async fn delete_prescription(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PrescriptionDeleted>>, ApiError> {
    let deleted = PrescriptionRepository::new(server.db.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::not_found("prescription"));
    }

    info!(prescription_id = %id, "Prescription hard-deleted");
    Ok(Json(api_success(PrescriptionDeleted { id, deleted: true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreatePrescriptionRequest {
        CreatePrescriptionRequest {
            prescription_number: Some("RX-1001".to_string()),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            appointment_id: None,
            notes: None,
            items: vec![CreatePrescriptionItemRequest {
                medicine_id: Uuid::new_v4(),
                dosage: Some("500mg".to_string()),
                quantity: Some(10),
                duration_days: Some(5),
                instructions: Some("After meals".to_string()),
            }],
        }
    }

    #[test]
    fn create_request_validates() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn create_request_rejects_empty_items() {
        let mut request = create_request();
        request.items.clear();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("items"));
    }

    #[test]
    fn create_request_rejects_nil_doctor() {
        let mut request = create_request();
        request.doctor_id = Uuid::nil();
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_zero_quantity() {
        let mut request = create_request();
        request.items[0].quantity = Some(0);
        assert!(request.validate().is_err());
    }
}
