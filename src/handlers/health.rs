use actix_web::{HttpResponse, Result};

use crate::models::HealthResponse;
use crate::utils::responses::ResponseBuilder;

/// Health check endpoint
///
/// # Errors
/// Returns an error if health status cannot be determined
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "SchedEuler auth callback service is running".to_string(),
    };
    Ok(ResponseBuilder::ok_json(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().route("/ping", web::get().to(health))).await;
        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/ping").to_request(),
        )
        .await;

        assert_eq!(body["status"], "ok");
    }
}
