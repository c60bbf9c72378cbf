use crate::models::health::{HealthResponse, PingResponse};
use rocket::serde::json::Json;
use rocket::{get, routes};

#[get("/health")]
pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
    })
}

#[get("/ping")]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}

/// Mounted at the server root.
pub fn root_routes() -> Vec<rocket::Route> {
    routes![healthcheck]
}

/// Mounted under the API base path.
pub fn routes() -> Vec<rocket::Route> {
    routes![ping]
}
