use crate::auth::CurrentUser;
use crate::models::user::UserProfileResponse;
use rocket::serde::json::Json;
use rocket::{get, routes};

// Profile fields are fixed until the handler reads from the user repository.
#[get("/user")]
pub async fn get_user(current_user: CurrentUser) -> Json<UserProfileResponse> {
    Json(UserProfileResponse {
        user_id: current_user.user_id,
        message: "User retrieved successfully",
        email: "user@example.com",
        first_name: "John",
        last_name: "Doe",
        created_at: "2024-01-01T00:00:00Z",
        updated_at: "2024-01-01T00:00:00Z",
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![get_user]
}

#[cfg(test)]
mod tests {
    use crate::auth::{JwtVerifier, PLACEHOLDER_USER_ID};
    use crate::build_rocket;
    use crate::config::TokenVerification;
    use crate::test_utils::test_config;
    use rocket::http::{Header, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::Value;

    #[rocket::async_test]
    async fn get_user_without_header_is_unauthorized() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");

        let response = client.get("/api/v1/user").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Authorization header required");
        assert_eq!(body["error"], "Unauthorized");
    }

    #[rocket::async_test]
    async fn get_user_with_empty_bearer_is_unauthorized() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");

        let response = client.get("/api/v1/user").header(Header::new("Authorization", "Bearer ")).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["message"], "Bearer token is empty");
    }

    #[rocket::async_test]
    async fn get_user_with_bare_bearer_scheme_is_unauthorized() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");

        let response = client.get("/api/v1/user").header(Header::new("Authorization", "Bearer")).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Bearer token is empty");
    }

    #[rocket::async_test]
    async fn get_user_accepts_any_token_with_placeholder_verifier() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");

        for value in ["Bearer anything", "raw-token", "Bearer x.y.z"] {
            let response = client.get("/api/v1/user").header(Header::new("Authorization", value)).dispatch().await;
            assert_eq!(response.status(), Status::Ok);
            let body: Value = response.into_json().await.expect("json body");
            assert_eq!(body["user_id"], PLACEHOLDER_USER_ID);
            assert_eq!(body["message"], "User retrieved successfully");
            assert_eq!(body["email"], "user@example.com");
            assert_eq!(body["first_name"], "John");
            assert_eq!(body["last_name"], "Doe");
            assert_eq!(body["created_at"], "2024-01-01T00:00:00Z");
            assert_eq!(body["updated_at"], "2024-01-01T00:00:00Z");
        }
    }

    #[rocket::async_test]
    async fn get_user_with_hmac_verification() {
        let mut config = test_config();
        config.jwt.verification = TokenVerification::Hmac;
        config.jwt.secret = "route-test-secret".to_string();
        let client = Client::tracked(build_rocket(config)).await.expect("valid rocket instance");

        let token = JwtVerifier::new("route-test-secret", 60).issue_token("user-7").unwrap();
        let response = client
            .get("/api/v1/user")
            .header(Header::new("Authorization", format!("Bearer {}", token)))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["user_id"], "user-7");

        let forged = JwtVerifier::new("other-secret", 60).issue_token("user-7").unwrap();
        let response = client
            .get("/api/v1/user")
            .header(Header::new("Authorization", format!("Bearer {}", forged)))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["message"], "Invalid token");

        let response = client.get("/api/v1/user").header(Header::new("Authorization", "Bearer anything")).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn options_preflight_on_protected_route() {
        let client = Client::tracked(build_rocket(test_config())).await.expect("valid rocket instance");

        let response = client.options("/api/v1/user").dispatch().await;
        assert_eq!(response.status(), Status::NoContent);
        assert_eq!(response.headers().get_one("Access-Control-Allow-Origin"), Some("http://localhost:3000"));
        assert!(response.headers().get_one("Access-Control-Allow-Methods").is_some());
        assert!(response.into_string().await.unwrap_or_default().is_empty());
    }
}
