use actix_web::web;

use crate::error::json_error_handler;

pub mod generate;
pub mod library;
pub mod system;

/// Maximum accepted JSON body (lesson text included)
const JSON_LIMIT: usize = 1024 * 1024;

/// Register every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(json_error_handler),
    )
    .service(system::health)
    .service(generate::generate)
    .service(library::list_flashcard_sets)
    .service(library::get_flashcard_set)
    .service(library::update_flashcard_set_summary)
    .service(library::delete_flashcard_set)
    .service(library::list_quizzes)
    .service(library::get_quiz)
    .service(library::update_quiz_summary)
    .service(library::delete_quiz)
    .service(library::grade_quiz);
}
