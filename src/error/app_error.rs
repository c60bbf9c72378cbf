use crate::models::response::ApiResponse;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, Response};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("User not found")]
    UserNotFound,
    #[error("User {0} already exists")]
    UserAlreadyExists(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Internal server error")]
    PasswordHash { message: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Failed to read configuration: {source}")]
    ConfigurationError {
        #[source]
        source: figment::Error,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn password_hash(message: impl Into<String>, source: password_hash::Error) -> Self {
        Self::PasswordHash {
            message: format!("{}: {}", message.into(), source),
        }
    }
}

impl From<password_hash::Error> for AppError {
    fn from(e: password_hash::Error) -> Self {
        AppError::password_hash("Password hashing failed", e)
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::Db { .. } => Status::InternalServerError,
            AppError::UserNotFound => Status::NotFound,
            AppError::UserAlreadyExists(_) => Status::Conflict,
            AppError::Unauthorized(_) => Status::Unauthorized,
            AppError::PasswordHash { .. } => Status::InternalServerError,
            AppError::NotFound(_) => Status::NotFound,
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::ConfigurationError { .. } => Status::InternalServerError,
            AppError::InvalidConfiguration(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        let user_id = req
            .local_cache(|| None::<crate::auth::CurrentUser>)
            .as_ref()
            .map(|u| u.user_id.clone())
            .unwrap_or_else(|| "anonymous".to_string());

        error!(
            error = ?self,
            request_id = %request_id,
            user_id = %user_id,
            method = %method,
            uri = %uri,
            "request failed"
        );

        let status = Status::from(&self);
        let body = ApiResponse::<()>::error(self.to_string(), status.reason_lossy());

        Response::build_from(Json(body).respond_to(req)?).status(status).ok()
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError { source: e }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::db("Database error", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::local::asynchronous::Client;
    use rocket::{get, routes};
    use serde_json::Value;

    #[get("/conflict")]
    fn conflict() -> Result<&'static str, AppError> {
        Err(AppError::UserAlreadyExists("jane@example.com".to_string()))
    }

    #[get("/db")]
    fn db_failure() -> Result<&'static str, AppError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(Status::from(&err), Status::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let mut errors = ValidationErrors::new();
        errors.add("email", validator::ValidationError::new("email"));
        let err: AppError = errors.into();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(Status::from(&err), Status::BadRequest);
    }

    #[test]
    fn database_errors_hide_details() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(Status::from(&err), Status::InternalServerError);
    }

    #[rocket::async_test]
    async fn responder_renders_error_envelope() {
        let rocket = rocket::build().mount("/", routes![conflict, db_failure]);
        let client = Client::tracked(rocket).await.expect("valid rocket instance");

        let response = client.get("/conflict").dispatch().await;
        assert_eq!(response.status(), Status::Conflict);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User jane@example.com already exists");
        assert_eq!(body["error"], "Conflict");
        assert!(body.get("data").is_none());

        let response = client.get("/db").dispatch().await;
        assert_eq!(response.status(), Status::InternalServerError);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["message"], "Internal server error");
    }
}
