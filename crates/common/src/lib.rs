pub mod config;
pub mod error;
pub mod grading;
pub mod logger;
pub mod study;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ServiceErrorKind, StudyCardsError};
pub use grading::{grade_quiz, QuestionResult, QuizScore};
pub use study::{
    AnswerLetter, Flashcard, GenerationRequest, GenerationResult, ItemCount, KeyConcept,
    QuizQuestion,
};
pub type Result<T> = std::result::Result<T, StudyCardsError>;
