use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::radiology_orders::{
    NewRadiologyOrder, RadiologyOrder, RadiologyOrderChanges, RadiologyOrderFilter,
    RadiologyOrderWithRelations,
};
use crate::db::RadiologyOrderRepository;
use crate::error::{api_success, api_success_with_meta, ApiError, ApiResponse};
use crate::server::MediCoreServer;
use crate::types::pagination::PaginationParams;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_required, validate_uuid};

const VALID_STATUSES: [&str; 4] = ["ORDERED", "IN_PROGRESS", "COMPLETED", "CANCELLED"];
const VALID_PRIORITIES: [&str; 3] = ["ROUTINE", "URGENT", "STAT"];
const VALID_MODALITIES: [&str; 5] = ["XRAY", "CT", "MRI", "ULTRASOUND", "PET"];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Create Radiology Order Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRadiologyOrderRequest {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub study_name: String,
    pub modality: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

impl RequestValidation for CreateRadiologyOrderRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_uuid!(self.patient_id, "patient_id is required");
        validate_required!(self.study_name, "study_name is required");
        if let Some(ref modality) = self.modality {
            validate_field!(
                modality,
                VALID_MODALITIES.contains(&modality.as_str()),
                format!("modality must be one of: {}", VALID_MODALITIES.join(", "))
            );
        }
        if let Some(ref priority) = self.priority {
            validate_field!(
                priority,
                VALID_PRIORITIES.contains(&priority.as_str()),
                format!("priority must be one of: {}", VALID_PRIORITIES.join(", "))
            );
        }
        Ok(())
    }
}

/// Update Radiology Order Request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRadiologyOrderRequest {
    pub doctor_id: Option<Uuid>,
    pub study_name: Option<String>,
    pub modality: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

impl RequestValidation for UpdateRadiologyOrderRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(ref study_name) = self.study_name {
            validate_required!(study_name, "study_name must not be empty");
        }
        if let Some(ref modality) = self.modality {
            validate_field!(
                modality,
                VALID_MODALITIES.contains(&modality.as_str()),
                format!("modality must be one of: {}", VALID_MODALITIES.join(", "))
            );
        }
        if let Some(ref status) = self.status {
            validate_field!(
                status,
                VALID_STATUSES.contains(&status.as_str()),
                format!("status must be one of: {}", VALID_STATUSES.join(", "))
            );
        }
        if let Some(ref priority) = self.priority {
            validate_field!(
                priority,
                VALID_PRIORITIES.contains(&priority.as_str()),
                format!("priority must be one of: {}", VALID_PRIORITIES.join(", "))
            );
        }
        Ok(())
    }
}

/// List Radiology Orders Query Parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRadiologyOrdersParams {
    pub patient_id: Option<Uuid>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListRadiologyOrdersParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

// ============================================================================
// API HANDLERS
// ============================================================================

/// Create a new radiology order
#[utoipa::path(
    post,
    path = "/api/v1/radiology-orders",
    request_body = CreateRadiologyOrderRequest,
    responses(
        (status = 201, description = "Radiology order created successfully", body = RadiologyOrderWithRelations),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "radiology"
)]
pub async fn create_radiology_order(
    State(server): State<MediCoreServer>,
    Json(request): Json<CreateRadiologyOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RadiologyOrderWithRelations>>), ApiError> {
    request.validate()?;

    let order = RadiologyOrderRepository::new(server.db.clone())
        .create(NewRadiologyOrder {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            appointment_id: request.appointment_id,
            study_name: request.study_name,
            modality: request.modality,
            status: "ORDERED".to_string(),
            priority: request.priority.unwrap_or_else(|| "ROUTINE".to_string()),
            notes: request.notes,
        })
        .await?;

    info!(order_number = %order.order.order_number, "Radiology order created");
    Ok((StatusCode::CREATED, Json(api_success(order))))
}

/// List radiology orders with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/radiology-orders",
    params(ListRadiologyOrdersParams),
    responses(
        (status = 200, description = "Radiology orders retrieved successfully", body = Vec<RadiologyOrderWithRelations>),
        (status = 500, description = "Internal server error")
    ),
    tag = "radiology"
)]
pub async fn list_radiology_orders(
    State(server): State<MediCoreServer>,
    Query(params): Query<ListRadiologyOrdersParams>,
) -> Result<Json<ApiResponse<Vec<RadiologyOrderWithRelations>>>, ApiError> {
    let pagination = params.pagination();
    let filter = RadiologyOrderFilter {
        patient_id: params.patient_id,
        status: params.status,
    };
    let (orders, total_count) = RadiologyOrderRepository::new(server.db.clone())
        .list(&filter, pagination.page, pagination.page_size)
        .await?;

    let metadata = pagination.to_metadata(total_count);
    Ok(Json(api_success_with_meta(orders, metadata)))
}

/// Get a specific radiology order
#[utoipa::path(
    get,
    path = "/api/v1/radiology-orders/{id}",
    params(("id" = Uuid, Path, description = "Radiology Order ID")),
    responses(
        (status = 200, description = "Radiology order retrieved successfully", body = RadiologyOrderWithRelations),
        (status = 404, description = "Radiology order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "radiology"
)]
pub async fn get_radiology_order(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RadiologyOrderWithRelations>>, ApiError> {
    match RadiologyOrderRepository::new(server.db.clone()).find_by_id(id).await? {
        Some(order) => Ok(Json(api_success(order))),
        None => Err(ApiError::not_found("radiology_order")),
    }
}

/// Update a radiology order
#[utoipa::path(
    put,
    path = "/api/v1/radiology-orders/{id}",
    params(("id" = Uuid, Path, description = "Radiology Order ID")),
    request_body = UpdateRadiologyOrderRequest,
    responses(
        (status = 200, description = "Radiology order updated successfully", body = RadiologyOrderWithRelations),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Radiology order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "radiology"
)]
pub async fn update_radiology_order(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRadiologyOrderRequest>,
) -> Result<Json<ApiResponse<RadiologyOrderWithRelations>>, ApiError> {
    request.validate()?;

    let changes = RadiologyOrderChanges {
        doctor_id: request.doctor_id,
        study_name: request.study_name,
        modality: request.modality,
        status: request.status,
        priority: request.priority,
        notes: request.notes,
    };

    match RadiologyOrderRepository::new(server.db.clone()).update(id, changes).await? {
        Some(order) => Ok(Json(api_success(order))),
        None => Err(ApiError::not_found("radiology_order")),
    }
}

/// Soft-delete a radiology order
#[utoipa::path(
    delete,
    path = "/api/v1/radiology-orders/{id}",
    params(("id" = Uuid, Path, description = "Radiology Order ID")),
    responses(
        (status = 200, description = "Radiology order deleted successfully", body = RadiologyOrder),
        (status = 404, description = "Radiology order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "radiology"
)]
pub async fn delete_radiology_order(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RadiologyOrder>>, ApiError> {
    match RadiologyOrderRepository::new(server.db.clone()).soft_delete(id).await? {
        Some(order) => Ok(Json(api_success(order))),
        None => Err(ApiError::not_found("radiology_order")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_rejects_unknown_modality() {
        let request = CreateRadiologyOrderRequest {
            patient_id: Uuid::new_v4(),
            doctor_id: None,
            appointment_id: None,
            study_name: "Chest X-Ray".to_string(),
            modality: Some("HOLOGRAM".to_string()),
            priority: None,
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_accepts_known_modality() {
        let request = CreateRadiologyOrderRequest {
            patient_id: Uuid::new_v4(),
            doctor_id: None,
            appointment_id: None,
            study_name: "Chest X-Ray".to_string(),
            modality: Some("XRAY".to_string()),
            priority: Some("URGENT".to_string()),
            notes: None,
        };
        assert!(request.validate().is_ok());
    }
}
