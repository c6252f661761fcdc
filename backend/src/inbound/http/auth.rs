//! Registration, login, logout, and session-status handlers.
//!
//! ```text
//! POST /api/auth/register {"username":"alice","email":"alice@x.com","password":"secret1"}
//! POST /api/auth/login    {"username":"alice","password":"secret1"}
//! POST /api/auth/logout
//! GET  /api/auth/me
//! GET  /api/auth/check
//! ```
//!
//! The register and login endpoints answer with `{success, message, ...}`
//! bodies; login failures share one generic message regardless of whether the
//! username exists.

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, PublicUser, RegistrationRequest};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;
use crate::outbound::RegistrationError;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Registration request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired unique username.
    pub username: String,
    /// Contact email, also unique.
    pub email: String,
    /// Plaintext password, at least six characters.
    pub password: String,
}

/// Registration outcome body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    /// Whether the account was created.
    pub success: bool,
    /// User-facing outcome description.
    pub message: String,
    /// Identifier of the new account on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Login request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username (email is not accepted in this field).
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Login outcome body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Whether the session was established.
    pub success: bool,
    /// User-facing outcome description.
    pub message: String,
    /// Public user fields on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

/// Body of the non-failing session probe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthStatusResponse {
    /// Whether a session user is present.
    pub authenticated: bool,
    /// The session user, when authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

fn failure(message: impl Into<String>) -> RegisterResponse {
    RegisterResponse {
        success: false,
        message: message.into(),
        user_id: None,
    }
}

/// Create a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tags = ["auth"],
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid payload or duplicate credentials", body = RegisterResponse),
        (status = 500, description = "Store failure", body = Error)
    )
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = match RegistrationRequest::try_from_parts(
        &payload.username,
        &payload.email,
        &payload.password,
    ) {
        Ok(request) => request,
        Err(err) => return Ok(HttpResponse::BadRequest().json(failure(err.to_string()))),
    };

    match state.users.register(&request).await {
        Ok(user_id) => Ok(HttpResponse::Created().json(RegisterResponse {
            success: true,
            message: "Registration complete".into(),
            user_id: Some(user_id),
        })),
        Err(err @ (RegistrationError::DuplicateUsername | RegistrationError::DuplicateEmail)) => {
            Ok(HttpResponse::BadRequest().json(failure(err.to_string())))
        }
        Err(RegistrationError::Store(err)) => {
            warn!(error = %err, "registration append failed");
            Err(Error::internal("registration could not be stored"))
        }
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tags = ["auth"],
    responses(
        (status = 200, description = "Session established", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid credentials", body = LoginResponse)
    )
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    // Malformed credentials take the same path as wrong ones; the response
    // must not reveal which part failed.
    let Ok(credentials) = LoginCredentials::try_from_parts(&payload.username, &payload.password)
    else {
        return Ok(unauthorized_login());
    };
    let Ok(user) = state.users.authenticate(&credentials).await else {
        return Ok(unauthorized_login());
    };
    session.persist_user(&user)?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Login successful".into(),
        user: Some(user),
    }))
}

fn unauthorized_login() -> HttpResponse {
    HttpResponse::Unauthorized().json(LoginResponse {
        success: false,
        message: INVALID_CREDENTIALS.into(),
        user: None,
    })
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tags = ["auth"],
    responses((status = 200, description = "Session cleared", body = LoginResponse))
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Logged out".into(),
        user: None,
    })
}

/// Return the authenticated user.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tags = ["auth"],
    responses(
        (status = 200, description = "Session user", body = PublicUser),
        (status = 401, description = "No session", body = Error)
    )
)]
#[get("/auth/me")]
pub async fn me(session: SessionContext) -> ApiResult<web::Json<PublicUser>> {
    Ok(web::Json(session.require_user()?))
}

/// Report session state without ever failing.
#[utoipa::path(
    get,
    path = "/api/auth/check",
    tags = ["auth"],
    responses((status = 200, description = "Session state", body = AuthStatusResponse))
)]
#[get("/auth/check")]
pub async fn check(session: SessionContext) -> web::Json<AuthStatusResponse> {
    let user = session.current_user();
    web::Json(AuthStatusResponse {
        authenticated: user.is_some(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{test_session_middleware, test_state};
    use actix_http::Request;
    use actix_web::body::BoxBody;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use rstest::rstest;
    use serde_json::Value;

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(state).service(
            web::scope("/api")
                .wrap(test_session_middleware())
                .service(register)
                .service(login)
                .service(logout)
                .service(me)
                .service(check),
        )
    }

    async fn register_alice(
        app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    ) {
        let res = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(RegisterRequest {
                    username: "alice".into(),
                    email: "alice@x.com".into(),
                    password: "secret1".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn register_returns_created_with_user_id() {
        let app = test::init_service(test_app(test_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(RegisterRequest {
                    username: "alice".into(),
                    email: "alice@x.com".into(),
                    password: "secret1".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: RegisterResponse = test::read_body_json(res).await;
        assert!(body.success);
        let user_id = body.user_id.expect("user id present");
        assert_eq!(user_id.len(), 32);
    }

    #[rstest]
    #[case("", "alice@x.com", "secret1")]
    #[case("alice", "  ", "secret1")]
    #[case("alice", "alice@x.com", "")]
    #[case("alice", "alice@x.com", "      ")]
    #[case("alice", "alice@x.com", "short")]
    #[actix_web::test]
    async fn register_rejects_invalid_payloads(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let app = test::init_service(test_app(test_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(RegisterRequest {
                    username: username.into(),
                    email: email.into(),
                    password: password.into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: RegisterResponse = test::read_body_json(res).await;
        assert!(!body.success);
        assert!(body.user_id.is_none());
    }

    #[actix_web::test]
    async fn register_rejects_duplicates() {
        let app = test::init_service(test_app(test_state())).await;
        register_alice(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(RegisterRequest {
                    username: "alice".into(),
                    email: "other@x.com".into(),
                    password: "secret1".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: RegisterResponse = test::read_body_json(res).await;
        assert_eq!(body.message, "username already registered");
    }

    #[actix_web::test]
    async fn login_sets_a_session_cookie_and_returns_the_user() {
        let app = test::init_service(test_app(test_state())).await;
        register_alice(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(LoginRequest {
                    username: "alice".into(),
                    password: "secret1".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
        let body: LoginResponse = test::read_body_json(res).await;
        let user = body.user.expect("user present");
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@x.com");
    }

    #[rstest]
    #[case("alice", "wrong-password")]
    #[case("mallory", "secret1")]
    #[case("", "secret1")]
    #[actix_web::test]
    async fn login_failures_share_one_generic_message(
        #[case] username: &str,
        #[case] password: &str,
    ) {
        let app = test::init_service(test_app(test_state())).await;
        register_alice(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(LoginRequest {
                    username: username.into(),
                    password: password.into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: LoginResponse = test::read_body_json(res).await;
        assert!(!body.success);
        assert_eq!(body.message, INVALID_CREDENTIALS);
        assert!(body.user.is_none());
    }

    #[actix_web::test]
    async fn me_requires_a_session_and_check_never_fails() {
        let app = test::init_service(test_app(test_state())).await;

        let me_res =
            test::call_service(&app, test::TestRequest::get().uri("/api/auth/me").to_request())
                .await;
        assert_eq!(me_res.status(), StatusCode::UNAUTHORIZED);

        let check_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/auth/check").to_request(),
        )
        .await;
        assert_eq!(check_res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(check_res).await;
        assert_eq!(body["authenticated"], false);
        assert!(body.get("user").is_none());
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let app = test::init_service(test_app(test_state())).await;
        register_alice(&app).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(LoginRequest {
                    username: "alice".into(),
                    password: "secret1".into(),
                })
                .to_request(),
        )
        .await;
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let me_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(me_res.status(), StatusCode::OK);

        let logout_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::OK);
        let cleared = logout_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("cleared cookie")
            .into_owned();

        let me_again = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/auth/me")
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(me_again.status(), StatusCode::UNAUTHORIZED);
    }
}
