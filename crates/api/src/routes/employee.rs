use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/employees", post(handlers::employee::create_employee))
        .route(
            "/api/employees/:id/schedule",
            get(handlers::employee::get_employee_schedule)
                .put(handlers::employee::update_employee_schedule),
        )
}
