use actix_web::{post, web, HttpResponse};
use studycards_common::GenerationRequest;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{GenerateBody, GenerateResponse};

/// Generate flashcards and a quiz from lesson text, optionally saving them
#[post("/generate")]
pub async fn generate(
    req: web::Json<GenerateBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let body = req.into_inner();
    let request = GenerationRequest::new(body.lesson_text, body.flashcard_count, body.quiz_count)?;

    let result = state.generator.generate(&request).await?;

    let saved = if body.save {
        Some(state.library.save_result(&result).await?)
    } else {
        None
    };

    info!(
        "Generation request served - {} flashcards, {} quiz questions, saved: {}",
        result.flashcards.len(),
        result.quiz_questions.len(),
        saved.is_some()
    );

    Ok(HttpResponse::Ok().json(GenerateResponse { result, saved }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::state_with;
    use crate::types::ErrorResponse;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;
    use std::sync::Arc;
    use studycards_llm::test_support::{sample_payload, StubBackend};

    const LESSON: &str = "Photosynthesis converts light into chemical energy.";

    #[actix_web::test]
    async fn test_generate_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::text(sample_payload(3, 3)));
        let state = state_with(backend.clone(), dir.path());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "lessonText": LESSON, "flashcardCount": 3, "quizCount": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: GenerateResponse = test::read_body_json(resp).await;
        assert_eq!(body.result.flashcards.len(), 3);
        assert_eq!(body.result.quiz_questions.len(), 3);
        assert_eq!(backend.calls(), 1);

        let saved = body.saved.unwrap();
        let set = state
            .library
            .get_flashcard_set(&saved.flashcard_set_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(set.flashcards, body.result.flashcards);
    }

    #[actix_web::test]
    async fn test_generate_without_save() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::text(sample_payload(5, 5)));
        let state = state_with(backend, dir.path());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "lessonText": LESSON, "save": false }))
            .to_request();
        let body: GenerateResponse = test::call_and_read_body_json(&app, req).await;
        assert!(body.saved.is_none());
        assert_eq!(body.result.flashcards.len(), 5);
        assert!(state.library.list_flashcard_sets().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_count_is_rejected_before_generation() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::text(sample_payload(3, 3)));
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend.clone(), dir.path()))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "lessonText": LESSON, "flashcardCount": 7, "quizCount": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, "invalid_input");
        assert_eq!(backend.calls(), 0);
    }

    #[actix_web::test]
    async fn test_blank_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::text(sample_payload(3, 3)));
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend.clone(), dir.path()))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "lessonText": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls(), 0);
    }

    #[actix_web::test]
    async fn test_rate_limited_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::status(429, "slow down"));
        let state = state_with(backend, dir.path());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "lessonText": LESSON, "flashcardCount": 3, "quizCount": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, "rate_limited");
        assert!(body.retryable);
        assert!(state.library.list_quizzes().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_shape_names_field() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::text(r#"{"quizQuestions": []}"#));
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend, dir.path()))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .set_json(json!({ "lessonText": LESSON }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, "invalid_shape");
        assert_eq!(body.field.as_deref(), Some("flashcards"));
        assert!(!body.retryable);
    }

    #[actix_web::test]
    async fn test_malformed_body_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(StubBackend::text(sample_payload(3, 3)));
        let app = test::init_service(
            App::new()
                .app_data(state_with(backend, dir.path()))
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/generate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ nope")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, "invalid_input");
    }
}
