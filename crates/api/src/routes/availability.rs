use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments/slots",
            get(handlers::availability::get_available_slots),
        )
        .route(
            "/api/employees/:id/availability",
            get(handlers::availability::get_employee_availability),
        )
}
