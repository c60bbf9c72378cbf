use rocket::serde::Serialize;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize, Debug)]
pub struct PingResponse {
    pub message: &'static str,
}
