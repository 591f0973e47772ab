use actix_web::{delete, get, post, put, web, HttpResponse};
use studycards_common::{grade_quiz as score_quiz, StudyCardsError};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{GradeRequest, LibraryKind, SuccessResponse, UpdateSummaryRequest};

#[get("/flashcards")]
pub async fn list_flashcard_sets(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let sets = state.library.list_flashcard_sets().await?;
    Ok(HttpResponse::Ok().json(sets))
}

#[get("/flashcards/{id}")]
pub async fn get_flashcard_set(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let set = state
        .library
        .get_flashcard_set(&id)
        .await?
        .ok_or_else(|| StudyCardsError::not_found(format!("{} {}", LibraryKind::Flashcards, id)))?;
    Ok(HttpResponse::Ok().json(set))
}

#[put("/flashcards/{id}/summary")]
pub async fn update_flashcard_set_summary(
    path: web::Path<String>,
    req: web::Json<UpdateSummaryRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    update_summary(&state, LibraryKind::Flashcards, &path.into_inner(), &req.summary).await
}

#[delete("/flashcards/{id}")]
pub async fn delete_flashcard_set(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    delete_entry(&state, LibraryKind::Flashcards, &path.into_inner()).await
}

#[get("/quizzes")]
pub async fn list_quizzes(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let quizzes = state.library.list_quizzes().await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quizzes/{id}")]
pub async fn get_quiz(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let quiz = state
        .library
        .get_quiz(&id)
        .await?
        .ok_or_else(|| StudyCardsError::not_found(format!("{} {}", LibraryKind::Quizzes, id)))?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[put("/quizzes/{id}/summary")]
pub async fn update_quiz_summary(
    path: web::Path<String>,
    req: web::Json<UpdateSummaryRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    update_summary(&state, LibraryKind::Quizzes, &path.into_inner(), &req.summary).await
}

#[delete("/quizzes/{id}")]
pub async fn delete_quiz(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    delete_entry(&state, LibraryKind::Quizzes, &path.into_inner()).await
}

/// Score zero-based option selections against a saved quiz
#[post("/quizzes/{id}/grade")]
pub async fn grade_quiz(
    path: web::Path<String>,
    req: web::Json<GradeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let quiz = state
        .library
        .get_quiz(&id)
        .await?
        .ok_or_else(|| StudyCardsError::not_found(format!("{} {}", LibraryKind::Quizzes, id)))?;

    let score = score_quiz(&quiz.questions, &req.answers);
    info!(
        "Graded quiz {}: {}/{} ({}%)",
        id, score.correct, score.total, score.percentage
    );
    Ok(HttpResponse::Ok().json(score))
}

async fn update_summary(
    state: &AppState,
    kind: LibraryKind,
    id: &str,
    summary: &str,
) -> Result<HttpResponse, ApiError> {
    state.library.update_summary(kind, id, summary).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: true,
        message: Some(format!("Summary of {} updated", kind)),
    }))
}

async fn delete_entry(state: &AppState, kind: LibraryKind, id: &str) -> Result<HttpResponse, ApiError> {
    state.library.delete(kind, id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: true,
        message: Some(format!("Deleted {}", kind)),
    }))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::state_with;
    use crate::types::{ErrorResponse, FlashcardSet, QuizSet, SavedResult};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::json;
    use std::sync::Arc;
    use studycards_common::QuizScore;
    use studycards_llm::normalize;
    use studycards_llm::test_support::{sample_payload, StubBackend};

    async fn seeded(dir: &std::path::Path) -> (actix_web::web::Data<crate::state::AppState>, SavedResult) {
        let state = state_with(Arc::new(StubBackend::text("{}")), dir);
        let result = normalize(&sample_payload(3, 4)).unwrap();
        let saved = state.library.save_result(&result).await.unwrap();
        (state, saved)
    }

    #[actix_web::test]
    async fn test_list_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let (state, saved) = seeded(dir.path()).await;
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/flashcards").to_request();
        let sets: Vec<FlashcardSet> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].total_flashcards, 3);

        let req = test::TestRequest::get()
            .uri(&format!("/quizzes/{}", saved.quiz_id))
            .to_request();
        let quiz: QuizSet = test::call_and_read_body_json(&app, req).await;
        assert_eq!(quiz.total_questions, 4);

        let req = test::TestRequest::get().uri("/quizzes/unknown").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.kind, "not_found");
    }

    #[actix_web::test]
    async fn test_update_summary_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let (state, saved) = seeded(dir.path()).await;
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::routes::configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/flashcards/{}/summary", saved.flashcard_set_id))
            .set_json(json!({ "summary": "Short version" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let set = state
            .library
            .get_flashcard_set(&saved.flashcard_set_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(set.summary, "Short version");

        let req = test::TestRequest::delete()
            .uri(&format!("/flashcards/{}", saved.flashcard_set_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/flashcards/{}", saved.flashcard_set_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_grade_quiz() {
        let dir = tempfile::tempdir().unwrap();
        let (state, saved) = seeded(dir.path()).await;
        let quiz = state.library.get_quiz(&saved.quiz_id).await.unwrap().unwrap();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::routes::configure),
        )
        .await;

        // Correct on the first two, wrong on the third, skip the fourth
        let answers: Vec<Option<usize>> = vec![
            Some(quiz.questions[0].correct_index()),
            Some(quiz.questions[1].correct_index()),
            Some((quiz.questions[2].correct_index() + 1) % 4),
            None,
        ];
        let req = test::TestRequest::post()
            .uri(&format!("/quizzes/{}/grade", saved.quiz_id))
            .set_json(json!({ "answers": answers }))
            .to_request();
        let score: QuizScore = test::call_and_read_body_json(&app, req).await;
        assert_eq!(score.correct, 2);
        assert_eq!(score.total, 4);
        assert_eq!(score.percentage, 50);
    }
}
