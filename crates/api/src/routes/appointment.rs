use axum::{
    Router,
    routing::{post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            post(handlers::appointment::create_appointment),
        )
        .route(
            "/api/appointments/:id/status",
            put(handlers::appointment::update_appointment_status),
        )
}
