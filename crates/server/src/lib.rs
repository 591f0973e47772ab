//! StudyCards HTTP server
//!
//! Actix-web REST API for generating flashcards and quizzes from lesson
//! text and for managing the saved library.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use studycards_common::{AppConfig, Result};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub mod error;
pub mod library;
pub mod routes;
pub mod state;
pub mod types;

pub use error::ApiError;
pub use library::{JsonLibraryStore, ResultStore};
pub use state::AppState;
pub use types::{FlashcardSet, LibraryKind, QuizSet, SavedResult};

/// Build application state and run the server until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = web::Data::new(AppState::new(config)?);

    if !state.generator.is_configured() {
        warn!("No API key configured, /generate will fail until one is set");
    }

    info!("Starting server on http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
