use std::sync::Arc;
use studycards_common::{AppConfig, Result};
use studycards_llm::{ChatCompletionsClient, StudyGenerator};

use crate::library::{JsonLibraryStore, ResultStore};

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Study material generator
    pub generator: StudyGenerator,

    /// Saved flashcard sets and quizzes
    pub library: Arc<dyn ResultStore>,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ChatCompletionsClient::from_config(&config)?;
        let library = JsonLibraryStore::open(&config.data_dir)?;

        Ok(Self::with_parts(
            config,
            StudyGenerator::new(Arc::new(client)),
            Arc::new(library),
        ))
    }

    /// Assemble state from explicit parts
    pub fn with_parts(
        config: AppConfig,
        generator: StudyGenerator,
        library: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            config,
            generator,
            library,
        }
    }
}
