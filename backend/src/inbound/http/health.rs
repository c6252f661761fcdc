//! Health endpoint.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `"ok"` while the service is handling requests.
    pub status: String,
    /// Human-readable status line.
    pub message: String,
}

/// Liveness check. Always succeeds while the process is serving requests;
/// a broken spreadsheet connection degrades endpoints instead of this probe.
#[utoipa::path(
    get,
    path = "/api/health",
    tags = ["health"],
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
#[get("/health")]
pub async fn health() -> web::Json<HealthResponse> {
    web::Json(HealthResponse {
        status: "ok".into(),
        message: "service is running".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn health_reports_ok() {
        let app =
            test::init_service(App::new().service(web::scope("/api").service(health))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/health").to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let body: HealthResponse = test::read_body_json(res).await;
        assert_eq!(body.status, "ok");
    }
}
