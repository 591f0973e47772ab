use std::sync::Arc;
use studycards_common::{GenerationRequest, GenerationResult, Result, StudyCardsError};
use tracing::{debug, info, warn};

use crate::llm_trait::GenerationBackend;
use crate::normalize::normalize;
use crate::prompts::generation_prompt;

/// Generates study material: prompt, one backend call, normalization
#[derive(Clone)]
pub struct StudyGenerator {
    backend: Arc<dyn GenerationBackend>,
}

impl StudyGenerator {
    /// Create new generator
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Whether the backend has a credential
    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    /// Generate a result for one request.
    ///
    /// Issues exactly one backend call. Errors are returned as-is; nothing is
    /// retried and no partial result is produced.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        if !self.backend.is_configured() {
            return Err(StudyCardsError::config(
                "Generation service API key not configured",
            ));
        }

        info!(
            "Starting generation - Text length: {} chars, flashcards: {}, quiz questions: {}",
            request.lesson_text().len(),
            request.flashcard_count(),
            request.quiz_count()
        );

        let prompt = generation_prompt(request);
        debug!("Prompt built - Length: {} chars", prompt.len());

        let raw = self.backend.complete(&prompt).await?;
        let result = normalize(&raw)?;

        let wanted_cards = request.flashcard_count().get() as usize;
        let wanted_quiz = request.quiz_count().get() as usize;
        if result.flashcards.len() != wanted_cards || result.quiz_questions.len() != wanted_quiz {
            warn!(
                "Model returned {} flashcards and {} quiz questions (asked for {} and {})",
                result.flashcards.len(),
                result.quiz_questions.len(),
                wanted_cards,
                wanted_quiz
            );
        }

        info!(
            "Generated {} flashcards and {} quiz questions",
            result.flashcards.len(),
            result.quiz_questions.len()
        );

        Ok(result)
    }
}
