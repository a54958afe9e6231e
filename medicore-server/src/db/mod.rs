//! Repositories for database operations
//!
//! Each entity family gets a repository struct owning a cloned
//! [`DatabasePool`]; handlers construct them per request from server
//! state. All SQL lives here, handlers stay at validate/translate level.

pub mod appointments;
pub mod departments;
pub mod lab_orders;
pub mod models;
pub mod prescriptions;
pub mod radiology_orders;

pub use appointments::AppointmentRepository;
pub use departments::DepartmentRepository;
pub use lab_orders::LabOrderRepository;
pub use prescriptions::PrescriptionRepository;
pub use radiology_orders::RadiologyOrderRepository;
