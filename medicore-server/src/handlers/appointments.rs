use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::db::appointments::{
    Appointment, AppointmentChanges, AppointmentDetail, AppointmentFilter, AppointmentWithRelations,
    NewAppointment,
};
use crate::db::{AppointmentRepository, DepartmentRepository};
use crate::error::{api_success, api_success_with_meta, ApiError, ApiResponse};
use crate::server::MediCoreServer;
use crate::types::pagination::PaginationParams;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_range, validate_required, validate_uuid};

/// Statuses an appointment can move through
const VALID_STATUSES: [&str; 6] = [
    "SCHEDULED",
    "CONFIRMED",
    "CHECKED_IN",
    "COMPLETED",
    "CANCELLED",
    "NO_SHOW",
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Create Appointment Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    /// Department category key, e.g. `CARDIOLOGY`; the row is created on
    /// first reference
    pub department: String,
    /// RFC 3339 datetime; validated explicitly so the caller gets a 400
    /// naming the field instead of a deserialization error
    pub scheduled_at: String,
    pub duration_mins: Option<i32>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

impl RequestValidation for CreateAppointmentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_uuid!(self.patient_id, "patient_id is required");
        validate_required!(self.department, "department is required");
        validate_required!(self.scheduled_at, "scheduled_at is required");

        if let Some(ref status) = self.status {
            validate_field!(
                status,
                VALID_STATUSES.contains(&status.as_str()),
                format!("status must be one of: {}", VALID_STATUSES.join(", "))
            );
        }
        if let Some(duration) = self.duration_mins {
            validate_range!(duration, 1, 1440, "duration_mins must be between 1 and 1440");
        }

        Ok(())
    }
}

/// Update Appointment Request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub doctor_id: Option<Uuid>,
    /// New department category key; re-resolved on update
    pub department: Option<String>,
    pub scheduled_at: Option<String>,
    pub duration_mins: Option<i32>,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl RequestValidation for UpdateAppointmentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(ref department) = self.department {
            validate_required!(department, "department must not be empty");
        }
        if let Some(ref status) = self.status {
            validate_field!(
                status,
                VALID_STATUSES.contains(&status.as_str()),
                format!("status must be one of: {}", VALID_STATUSES.join(", "))
            );
        }
        if let Some(duration) = self.duration_mins {
            validate_range!(duration, 1, 1440, "duration_mins must be between 1 and 1440");
        }
        Ok(())
    }
}

/// List Appointments Query Parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAppointmentsParams {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListAppointmentsParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Parse the scheduled timestamp, mapping failure to a field-naming 400
fn parse_scheduled_at(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::validation("scheduled_at must be a valid RFC 3339 datetime"))
}

// ============================================================================
// API HANDLERS
// ============================================================================

/// Create a new appointment
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created successfully", body = AppointmentWithRelations),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "appointments"
)]
pub async fn create_appointment(
    State(server): State<MediCoreServer>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentWithRelations>>), ApiError> {
    request.validate()?;
    let scheduled_at = parse_scheduled_at(&request.scheduled_at)?;

    let department = DepartmentRepository::new(server.db.clone())
        .resolve(&request.department)
        .await?;

    let appointment = AppointmentRepository::new(server.db.clone())
        .create(NewAppointment {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            department_id: department.id,
            scheduled_at,
            duration_mins: request.duration_mins.unwrap_or(30),
            status: request.status.unwrap_or_else(|| "SCHEDULED".to_string()),
            reason: request.reason,
            notes: request.notes,
            created_by: request.created_by,
        })
        .await?;

    info!(
        appointment_number = %appointment.appointment.appointment_number,
        department = %department.department_type,
        "Appointment created"
    );

    Ok((StatusCode::CREATED, Json(api_success(appointment))))
}

/// List appointments with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(ListAppointmentsParams),
    responses(
        (status = 200, description = "Appointments retrieved successfully", body = Vec<AppointmentWithRelations>),
        (status = 500, description = "Internal server error")
    ),
    tag = "appointments"
)]
pub async fn list_appointments(
    State(server): State<MediCoreServer>,
    Query(params): Query<ListAppointmentsParams>,
) -> Result<Json<ApiResponse<Vec<AppointmentWithRelations>>>, ApiError> {
    let pagination = params.pagination();
    let filter = AppointmentFilter {
        patient_id: params.patient_id,
        doctor_id: params.doctor_id,
        status: params.status,
    };
    let (appointments, total_count) = AppointmentRepository::new(server.db.clone())
        .list(&filter, pagination.page, pagination.page_size)
        .await?;

    let metadata = pagination.to_metadata(total_count);
    Ok(Json(api_success_with_meta(appointments, metadata)))
}

/// Get a specific appointment with its extended relation set
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment retrieved successfully", body = AppointmentDetail),
        (status = 404, description = "Appointment not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "appointments"
)]
pub async fn get_appointment(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AppointmentDetail>>, ApiError> {
    match AppointmentRepository::new(server.db.clone()).find_by_id(id).await? {
        Some(appointment) => Ok(Json(api_success(appointment))),
        None => Err(ApiError::not_found("appointment")),
    }
}

/// Update an appointment
#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated successfully", body = AppointmentWithRelations),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Appointment not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "appointments"
)]
pub async fn update_appointment(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentWithRelations>>, ApiError> {
    request.validate()?;

    let scheduled_at = match request.scheduled_at.as_deref() {
        Some(raw) => Some(parse_scheduled_at(raw)?),
        None => None,
    };

    let department_id = match request.department.as_deref() {
        Some(key) => Some(
            DepartmentRepository::new(server.db.clone())
                .resolve(key)
                .await?
                .id,
        ),
        None => None,
    };

    let changes = AppointmentChanges {
        doctor_id: request.doctor_id,
        department_id,
        scheduled_at,
        duration_mins: request.duration_mins,
        status: request.status,
        reason: request.reason,
        notes: request.notes,
    };

    match AppointmentRepository::new(server.db.clone()).update(id, changes).await? {
        Some(appointment) => Ok(Json(api_success(appointment))),
        None => Err(ApiError::not_found("appointment")),
    }
}

/// Soft-delete an appointment
///
/// The row is flagged and retained; it disappears from listings but
/// stays retrievable by id.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment deleted successfully", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "appointments"
)]
pub async fn delete_appointment(
    State(server): State<MediCoreServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, ApiError> {
    match AppointmentRepository::new(server.db.clone()).soft_delete(id).await? {
        Some(appointment) => {
            info!(appointment_id = %id, "Appointment soft-deleted");
            Ok(Json(api_success(appointment)))
        }
        None => Err(ApiError::not_found("appointment")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            patient_id: Uuid::new_v4(),
            doctor_id: None,
            department: "CARDIOLOGY".to_string(),
            scheduled_at: "2026-09-01T10:30:00Z".to_string(),
            duration_mins: None,
            status: None,
            reason: Some("Routine checkup".to_string()),
            notes: None,
            created_by: None,
        }
    }

    #[test]
    fn create_request_validates() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn create_request_rejects_missing_department() {
        let mut request = create_request();
        request.department = "".to_string();
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("department"));
    }

    #[test]
    fn create_request_rejects_nil_patient() {
        let mut request = create_request();
        request.patient_id = Uuid::nil();
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_unknown_status() {
        let mut request = create_request();
        request.status = Some("PENDING_FOREVER".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn scheduled_at_parses_rfc3339_and_normalizes_to_utc() {
        let parsed = parse_scheduled_at("2026-09-01T10:30:00+05:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-09-01T05:00:00+00:00");
    }

    #[test]
    fn scheduled_at_rejects_garbage_with_field_name() {
        let err = parse_scheduled_at("not-a-date").unwrap_err();
        assert!(err.to_string().contains("datetime"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn update_request_allows_department_only() {
        let request = UpdateAppointmentRequest {
            doctor_id: None,
            department: Some("NEUROLOGY".to_string()),
            scheduled_at: None,
            duration_mins: None,
            status: None,
            reason: None,
            notes: None,
        };
        assert!(request.validate().is_ok());
    }
}
