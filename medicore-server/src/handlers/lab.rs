use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::lab_orders::{
    LabOrder, LabOrderChanges, LabOrderFilter, LabOrderWithRelations, NewLabOrder,
};
use crate::db::LabOrderRepository;
use crate::error::{api_success, api_success_with_meta, ApiError, ApiResponse};
use crate::server::MediCoreServer;
use crate::types::pagination::PaginationParams;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_required, validate_uuid};

const VALID_STATUSES: [&str; 4] = ["ORDERED", "IN_PROGRESS", "COMPLETED", "CANCELLED"];
const VALID_PRIORITIES: [&str; 3] = ["ROUTINE", "URGENT", "STAT"];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Create Lab Order Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLabOrderRequest {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub test_name: String,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

impl RequestValidation for CreateLabOrderRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_uuid!(self.patient_id, "patient_id is required");
        validate_required!(self.test_name, "test_name is required");
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

/// Update Lab Order Request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLabOrderRequest {
    pub doctor_id: Option<Uuid>,
    pub test_name: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

impl RequestValidation for UpdateLabOrderRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(ref test_name) = self.test_name {
            validate_required!(test_name, "test_name must not be empty");
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

/// List Lab Orders Query Parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListLabOrdersParams {
    pub patient_id: Option<Uuid>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListLabOrdersParams {
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

/// Create a new lab order
#[utoipa::path(
    post,
    path = "/api/v1/lab-orders",
    request_body = CreateLabOrderRequest,
    responses(
        (status = 201, description = "Lab order created successfully", body = LabOrderWithRelations),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "lab"
)]
pub async fn create_lab_order(
    State(server): State<MediCoreServer>,
    Json(request): Json<CreateLabOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LabOrderWithRelations>>), ApiError> {
    request.validate()?;

    let order = LabOrderRepository::new(server.db.clone())
        .create(NewLabOrder {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            appointment_id: request.appointment_id,
            test_name: request.test_name,
            status: "ORDERED".to_string(),
            priority: request.priority.unwrap_or_else(|| "ROUTINE".to_string()),
            notes: request.notes,
        })
        .await?;

    info!(order_number = %order.order.order_number, "Lab order created");
    Ok((StatusCode::CREATED, Json(api_success(order))))
}

/// List lab orders with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/lab-orders",
    params(ListLabOrdersParams),
    responses(
        (status = 200, description = "Lab orders retrieved successfully", body = Vec<LabOrderWithRelations>),
        (status = 500, description = "Internal server error")
    ),
    tag = "lab"
)]
pub async fn list_lab_orders(
    State(server): State<MediCoreServer>,
    Query(params): Query<ListLabOrdersParams>,
) -> Result<Json<ApiResponse<Vec<LabOrderWithRelations>>>, ApiError> {
    let pagination = params.pagination();
    let filter = LabOrderFilter {
        patient_id: params.patient_id,
        status: params.status,
    };
    let (orders, total_count) = LabOrderRepository::new(server.db.clone())
        .list(&filter, pagination.page, pagination.page_size)
        .await?;

    let metadata = pagination.to_metadata(total_count);
    Ok(Json(api_success_with_meta(orders, metadata)))
}

/// Get a specific lab order
#[utoipa::path(
    get,
    path = "/api/v1/lab-orders/{id}",
    params(("id" = Uuid, Path, description = "Lab Order ID")),
    responses(
        (status = 200, description = "Lab order retrieved successfully", body = LabOrderWithRelations),
        (status = 404, description = "Lab order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "lab"
)]
pub async fn get_lab_order(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LabOrderWithRelations>>, ApiError> {
    match LabOrderRepository::new(server.db.clone()).find_by_id(id).await? {
        Some(order) => Ok(Json(api_success(order))),
        None => Err(ApiError::not_found("lab_order")),
    }
}

/// Update a lab order
#[utoipa::path(
    put,
    path = "/api/v1/lab-orders/{id}",
    params(("id" = Uuid, Path, description = "Lab Order ID")),
    request_body = UpdateLabOrderRequest,
    responses(
        (status = 200, description = "Lab order updated successfully", body = LabOrderWithRelations),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Lab order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "lab"
)]
pub async fn update_lab_order(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLabOrderRequest>,
) -> Result<Json<ApiResponse<LabOrderWithRelations>>, ApiError> {
    request.validate()?;

    let changes = LabOrderChanges {
        doctor_id: request.doctor_id,
        test_name: request.test_name,
        status: request.status,
        priority: request.priority,
        notes: request.notes,
    };

    match LabOrderRepository::new(server.db.clone()).update(id, changes).await? {
        Some(order) => Ok(Json(api_success(order))),
        None => Err(ApiError::not_found("lab_order")),
    }
}

/// Soft-delete a lab order
#[utoipa::path(
    delete,
    path = "/api/v1/lab-orders/{id}",
    params(("id" = Uuid, Path, description = "Lab Order ID")),
    responses(
        (status = 200, description = "Lab order deleted successfully", body = LabOrder),
        (status = 404, description = "Lab order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "lab"
)]
pub async fn delete_lab_order(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LabOrder>>, ApiError> {
    match LabOrderRepository::new(server.db.clone()).soft_delete(id).await? {
        Some(order) => Ok(Json(api_success(order))),
        None => Err(ApiError::not_found("lab_order")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_test_name() {
        let request = CreateLabOrderRequest {
            patient_id: Uuid::new_v4(),
            doctor_id: None,
            appointment_id: None,
            test_name: " ".to_string(),
            priority: None,
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_unknown_priority() {
        let request = CreateLabOrderRequest {
            patient_id: Uuid::new_v4(),
            doctor_id: None,
            appointment_id: None,
            test_name: "CBC".to_string(),
            priority: Some("WHENEVER".to_string()),
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_accepts_status_transition() {
        let request = UpdateLabOrderRequest {
            doctor_id: None,
            test_name: None,
            status: Some("COMPLETED".to_string()),
            priority: None,
            notes: None,
        };
        assert!(request.validate().is_ok());
    }
}
