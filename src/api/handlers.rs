use crate::models::Health;
use axum::Json;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}
