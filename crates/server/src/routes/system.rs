use actix_web::{get, web, HttpResponse};

use crate::state::AppState;
use crate::types::HealthResponse;

/// Liveness and generation readiness
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: state.config.model.clone(),
        generation_configured: state.generator.is_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::state_with;
    use actix_web::{test, App};
    use std::sync::Arc;
    use studycards_llm::test_support::StubBackend;

    #[actix_web::test]
    async fn test_health_reports_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::text("{}").unconfigured());
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend, dir.path()))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.model, "deepseek-chat");
        assert!(!body.generation_configured);
    }
}
