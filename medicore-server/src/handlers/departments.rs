use axum::{extract::State, Json};

use crate::db::models::Department;
use crate::db::DepartmentRepository;
use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::MediCoreServer;

/// List departments
///
/// Departments are created lazily when appointments reference them;
/// this is the read-only surface over the accumulated lookup rows.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Departments retrieved successfully", body = Vec<Department>),
        (status = 500, description = "Internal server error")
    ),
    tag = "departments"
)]
pub async fn list_departments(
    State(server): State<MediCoreServer>,
) -> Result<Json<ApiResponse<Vec<Department>>>, ApiError> {
    let departments = DepartmentRepository::new(server.db.clone()).list().await?;
    Ok(Json(api_success(departments)))
}
