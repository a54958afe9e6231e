use crate::{
    handlers::{appointments, departments, health, lab, prescriptions, radiology},
    server::MediCoreServer,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

/// Create health check routes
pub fn health_routes() -> Router<MediCoreServer> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/version", get(health::version_info))
}

/// Create appointment routes
pub fn appointment_routes() -> Router<MediCoreServer> {
    Router::new()
        .route("/appointments", get(appointments::list_appointments))
        .route("/appointments", post(appointments::create_appointment))
        .route("/appointments/:id", get(appointments::get_appointment))
        .route("/appointments/:id", put(appointments::update_appointment))
        .route("/appointments/:id", delete(appointments::delete_appointment))
}

/// Create prescription routes
pub fn prescription_routes() -> Router<MediCoreServer> {
    Router::new()
        .route("/prescriptions", get(prescriptions::list_prescriptions))
        .route("/prescriptions", post(prescriptions::create_prescription))
        .route("/prescriptions/:id", get(prescriptions::get_prescription))
        .route("/prescriptions/:id", delete(prescriptions::delete_prescription))
}

/// Create lab order routes
pub fn lab_routes() -> Router<MediCoreServer> {
    Router::new()
        .route("/lab-orders", get(lab::list_lab_orders))
        .route("/lab-orders", post(lab::create_lab_order))
        .route("/lab-orders/:id", get(lab::get_lab_order))
        .route("/lab-orders/:id", put(lab::update_lab_order))
        .route("/lab-orders/:id", delete(lab::delete_lab_order))
}

/// Create radiology order routes
pub fn radiology_routes() -> Router<MediCoreServer> {
    Router::new()
        .route("/radiology-orders", get(radiology::list_radiology_orders))
        .route("/radiology-orders", post(radiology::create_radiology_order))
        .route("/radiology-orders/:id", get(radiology::get_radiology_order))
        .route("/radiology-orders/:id", put(radiology::update_radiology_order))
        .route("/radiology-orders/:id", delete(radiology::delete_radiology_order))
}

/// Create department routes
pub fn department_routes() -> Router<MediCoreServer> {
    Router::new().route("/departments", get(departments::list_departments))
}

/// Create API v1 routes
pub fn api_v1_routes() -> Router<MediCoreServer> {
    Router::new()
        .merge(appointment_routes())
        .merge(prescription_routes())
        .merge(lab_routes())
        .merge(radiology_routes())
        .merge(department_routes())
}

/// Create all application routes
pub fn create_routes() -> Router<MediCoreServer> {
    Router::new()
        // Health check routes (no versioning)
        .merge(health_routes())
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
}
