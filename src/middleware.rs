use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Method, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::{Data, Response};
use std::io::Cursor;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

const CORS_ALLOWED_HEADERS: &str =
    "Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization, accept, origin, Cache-Control, X-Requested-With";
const CORS_ALLOWED_METHODS: &str = "POST, OPTIONS, GET, PUT, DELETE";

/// Request ID that is attached to every request for tracking
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestId {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        if let Some(request_id) = request.local_cache(|| None::<RequestId>).as_ref() {
            return Outcome::Success(request_id.clone());
        }

        Outcome::Success(RequestId::new())
    }
}

/// Start of request handling, used to report latency.
#[derive(Debug, Clone, Copy)]
struct RequestStart(Instant);

/// Fairing that tags every request with an ID and logs method, path,
/// status, latency and client address once the response is ready.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        let request_id = RequestId::new();
        request.local_cache(|| Some(request_id.clone()));
        request.local_cache(|| Some(RequestStart(Instant::now())));
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let request_id = request
            .local_cache(|| None::<RequestId>)
            .as_ref()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let latency_ms = request
            .local_cache(|| None::<RequestStart>)
            .as_ref()
            .map(|start| start.0.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or_default();

        let client_ip = request.client_ip().map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".to_string());
        let status = response.status();
        let method = request.method();
        let path = request.uri().path();

        response.set_header(Header::new("X-Request-Id", request_id.clone()));

        if status.class().is_server_error() || status.class().is_client_error() {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.code,
                latency_ms = latency_ms,
                client_ip = %client_ip,
                "request completed with error"
            );
        } else {
            info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = status.code,
                latency_ms = latency_ms,
                client_ip = %client_ip,
                "request completed"
            );
        }
    }
}

/// Fairing that adds cross-origin headers for a single allowed origin and
/// answers every `OPTIONS` request with an empty 204.
pub struct Cors {
    allowed_origin: String,
}

impl Cors {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
        }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", self.allowed_origin.clone()));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
        response.set_header(Header::new("Access-Control-Allow-Headers", CORS_ALLOWED_HEADERS));
        response.set_header(Header::new("Access-Control-Allow-Methods", CORS_ALLOWED_METHODS));

        // Preflight: no handler or guard result reaches the client.
        if request.method() == Method::Options {
            response.set_status(Status::NoContent);
            response.remove_header("Content-Type");
            response.set_sized_body(0usize, Cursor::new(Vec::<u8>::new()));
        }
    }
}
