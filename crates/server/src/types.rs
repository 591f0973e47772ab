use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use studycards_common::{Flashcard, GenerationResult, KeyConcept, QuizQuestion};

/// Saved flashcard set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSet {
    /// Storage-assigned identifier
    pub id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Lesson summary
    #[serde(default)]
    pub summary: String,

    /// Key concepts
    #[serde(default)]
    pub key_concepts: Vec<KeyConcept>,

    /// Flashcards
    pub flashcards: Vec<Flashcard>,

    /// Number of flashcards
    pub total_flashcards: usize,
}

/// Saved quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSet {
    /// Storage-assigned identifier
    pub id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Lesson summary
    #[serde(default)]
    pub summary: String,

    /// Key concepts
    #[serde(default)]
    pub key_concepts: Vec<KeyConcept>,

    /// Quiz questions
    pub questions: Vec<QuizQuestion>,

    /// Number of questions
    pub total_questions: usize,
}

/// Library collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Flashcards,
    Quizzes,
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flashcards => f.write_str("flashcard set"),
            Self::Quizzes => f.write_str("quiz"),
        }
    }
}

/// Identity assigned when a generation result is stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResult {
    pub flashcard_set_id: String,
    pub quiz_id: String,
    pub created_at: DateTime<Utc>,
}

/// Generate request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    /// Lesson text
    pub lesson_text: String,

    /// Number of flashcards (3, 5, 10 or 15)
    #[serde(default = "default_item_count")]
    pub flashcard_count: u32,

    /// Number of quiz questions (3, 5, 10 or 15)
    #[serde(default = "default_item_count")]
    pub quiz_count: u32,

    /// Store the result in the library
    #[serde(default = "default_save")]
    pub save: bool,
}

fn default_item_count() -> u32 {
    5
}

fn default_save() -> bool {
    true
}

/// Generate response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Generated material
    pub result: GenerationResult,

    /// Library identity, when saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SavedResult>,
}

/// Summary update request
#[derive(Debug, Deserialize)]
pub struct UpdateSummaryRequest {
    pub summary: String,
}

/// Quiz grading request: zero-based option per question, `null` if skipped
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub answers: Vec<Option<usize>>,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub error: String,

    /// Machine readable error kind
    pub kind: String,

    /// Offending field for shape errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Whether retrying after a pause may succeed
    pub retryable: bool,
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub generation_configured: bool,
}

/// Generic success response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
