use crate::auth::AuthError;
use crate::middleware::RequestId;
use crate::models::response::ApiResponse;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Request, catch};
use tracing::error;

type ErrorBody = Json<ApiResponse<()>>;

fn request_id(req: &Request<'_>) -> String {
    req.local_cache(|| None::<RequestId>)
        .as_ref()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

fn envelope(message: impl Into<String>, status: Status) -> ErrorBody {
    Json(ApiResponse::error(message, status.reason_lossy()))
}

#[catch(401)]
pub fn unauthorized(req: &Request) -> ErrorBody {
    let message = req
        .local_cache(|| None::<AuthError>)
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| AuthError::MissingHeader.to_string());

    envelope(message, Status::Unauthorized)
}

#[catch(404)]
pub fn not_found(_: &Request) -> ErrorBody {
    envelope("Not found", Status::NotFound)
}

#[catch(422)]
pub fn unprocessable_entity(_: &Request) -> ErrorBody {
    envelope("Request body could not be parsed", Status::UnprocessableEntity)
}

/// Reached for handler panics as well as explicit 500s. The process keeps
/// serving; only this request fails.
#[catch(500)]
pub fn internal_error(req: &Request) -> ErrorBody {
    error!(
        request_id = %request_id(req),
        method = %req.method(),
        uri = %req.uri(),
        "unhandled failure while processing request"
    );

    envelope("Internal server error", Status::InternalServerError)
}

#[catch(default)]
pub fn default_catcher(status: Status, _: &Request) -> ErrorBody {
    envelope(status.reason_lossy(), status)
}
