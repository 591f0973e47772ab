//! Study material types shared by the generator, the library store and the API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StudyCardsError;
use crate::Result;

/// Item counts a user may request for flashcards and quiz questions
pub const ALLOWED_ITEM_COUNTS: [u32; 4] = [3, 5, 10, 15];

/// Number of key concepts the model is asked to extract
pub const KEY_CONCEPT_COUNT: usize = 5;

/// Options per quiz question
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Requested number of generated items, restricted to [`ALLOWED_ITEM_COUNTS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ItemCount {
    Three,
    Five,
    Ten,
    Fifteen,
}

impl ItemCount {
    /// Numeric value
    pub fn get(self) -> u32 {
        match self {
            Self::Three => 3,
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
        }
    }
}

impl Default for ItemCount {
    fn default() -> Self {
        Self::Five
    }
}

impl TryFrom<u32> for ItemCount {
    type Error = StudyCardsError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            3 => Ok(Self::Three),
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            15 => Ok(Self::Fifteen),
            other => Err(StudyCardsError::invalid_input(format!(
                "item count must be one of {:?}, got {}",
                ALLOWED_ITEM_COUNTS, other
            ))),
        }
    }
}

impl From<ItemCount> for u32 {
    fn from(count: ItemCount) -> Self {
        count.get()
    }
}

impl fmt::Display for ItemCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// One user submission: lesson text plus how many items to generate.
///
/// Only constructed through [`GenerationRequest::new`], so a value of this
/// type always holds non-blank text and allowed counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    lesson_text: String,
    flashcard_count: ItemCount,
    quiz_count: ItemCount,
}

impl GenerationRequest {
    /// Validate and build a request
    pub fn new(lesson_text: impl Into<String>, flashcard_count: u32, quiz_count: u32) -> Result<Self> {
        let lesson_text = lesson_text.into();
        if lesson_text.trim().is_empty() {
            return Err(StudyCardsError::invalid_input("lesson text cannot be empty"));
        }

        let flashcard_count = ItemCount::try_from(flashcard_count).map_err(|_| {
            StudyCardsError::invalid_input(format!(
                "flashcard count must be one of {:?}, got {}",
                ALLOWED_ITEM_COUNTS, flashcard_count
            ))
        })?;
        let quiz_count = ItemCount::try_from(quiz_count).map_err(|_| {
            StudyCardsError::invalid_input(format!(
                "quiz question count must be one of {:?}, got {}",
                ALLOWED_ITEM_COUNTS, quiz_count
            ))
        })?;

        Ok(Self {
            lesson_text,
            flashcard_count,
            quiz_count,
        })
    }

    pub fn lesson_text(&self) -> &str {
        &self.lesson_text
    }

    pub fn flashcard_count(&self) -> ItemCount {
        self.flashcard_count
    }

    pub fn quiz_count(&self) -> ItemCount {
        self.quiz_count
    }
}

/// Letter designating the correct quiz option.
///
/// Letters map to zero-based option positions: `A = 0`, `B = 1`, `C = 2`, `D = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; QUIZ_OPTION_COUNT] = [Self::A, Self::B, Self::C, Self::D];

    /// Zero-based option index
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    /// Letter for a zero-based option index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl FromStr for AnswerLetter {
    type Err = StudyCardsError;

    /// Accepts a single letter, ignoring surrounding whitespace and case
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            other => Err(StudyCardsError::invalid_input(format!(
                "answer letter must be one of A, B, C, D, got {:?}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for AnswerLetter {
    type Error = StudyCardsError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AnswerLetter> for String {
    fn from(letter: AnswerLetter) -> Self {
        letter.as_str().to_string()
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named idea extracted from the lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConcept {
    #[serde(default)]
    pub concept: String,

    #[serde(default)]
    pub explanation: String,
}

/// Question/answer pair for self-testing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Unique within its batch
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// Single best-choice question with exactly four options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// Unique within its batch
    pub id: String,
    pub question: String,
    pub options: [String; QUIZ_OPTION_COUNT],
    pub correct_answer: AnswerLetter,
}

impl QuizQuestion {
    /// Zero-based index of the correct option
    pub fn correct_index(&self) -> usize {
        self.correct_answer.index()
    }

    /// Text of the correct option
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index()]
    }

    /// Whether the zero-based `selected` option is the correct one
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index()
    }
}

/// Everything produced from one lesson
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub summary: String,
    pub key_concepts: Vec<KeyConcept>,
    pub flashcards: Vec<Flashcard>,
    pub quiz_questions: Vec<QuizQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_count_accepts_allowed_values() {
        for value in ALLOWED_ITEM_COUNTS {
            let count = ItemCount::try_from(value).unwrap();
            assert_eq!(count.get(), value);
        }
        assert!(ItemCount::try_from(4).is_err());
        assert!(ItemCount::try_from(0).is_err());
        assert!(ItemCount::try_from(20).is_err());
    }

    #[test]
    fn test_item_count_serde() {
        let count: ItemCount = serde_json::from_str("10").unwrap();
        assert_eq!(count, ItemCount::Ten);
        assert_eq!(serde_json::to_string(&count).unwrap(), "10");
        assert!(serde_json::from_str::<ItemCount>("7").is_err());
    }

    #[test]
    fn test_request_rejects_blank_text() {
        let err = GenerationRequest::new("   \n\t", 5, 5).unwrap_err();
        assert!(matches!(err, StudyCardsError::InvalidInput(_)));
    }

    #[test]
    fn test_request_rejects_bad_counts() {
        let err = GenerationRequest::new("Cells divide.", 4, 5).unwrap_err();
        assert!(err.to_string().contains("flashcard count"));

        let err = GenerationRequest::new("Cells divide.", 5, 100).unwrap_err();
        assert!(err.to_string().contains("quiz question count"));
    }

    #[test]
    fn test_request_keeps_text_verbatim() {
        let request = GenerationRequest::new("  Cells divide.  ", 3, 15).unwrap();
        assert_eq!(request.lesson_text(), "  Cells divide.  ");
        assert_eq!(request.flashcard_count(), ItemCount::Three);
        assert_eq!(request.quiz_count(), ItemCount::Fifteen);
    }

    #[test]
    fn test_answer_letter_indexing() {
        assert_eq!(AnswerLetter::A.index(), 0);
        assert_eq!(AnswerLetter::D.index(), 3);
        assert_eq!(AnswerLetter::from_index(2), Some(AnswerLetter::C));
        assert_eq!(AnswerLetter::from_index(4), None);
        for letter in AnswerLetter::ALL {
            assert_eq!(AnswerLetter::from_index(letter.index()), Some(letter));
        }
    }

    #[test]
    fn test_answer_letter_parsing() {
        assert_eq!(" b ".parse::<AnswerLetter>().unwrap(), AnswerLetter::B);
        assert_eq!("D".parse::<AnswerLetter>().unwrap(), AnswerLetter::D);
        assert!("E".parse::<AnswerLetter>().is_err());
        assert!("Option A".parse::<AnswerLetter>().is_err());
        assert!("".parse::<AnswerLetter>().is_err());
    }

    #[test]
    fn test_quiz_question_wire_shape() {
        let json = r#"{
            "id": "q1",
            "question": "What do plants absorb?",
            "options": ["Light", "Sound", "Heat", "Noise"],
            "correctAnswer": "a"
        }"#;
        let question: QuizQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.correct_answer, AnswerLetter::A);
        assert_eq!(question.correct_option(), "Light");
        assert!(question.is_correct(0));
        assert!(!question.is_correct(1));

        let out = serde_json::to_value(&question).unwrap();
        assert_eq!(out["correctAnswer"], "A");
    }

    #[test]
    fn test_quiz_question_requires_four_options() {
        let json = r#"{
            "id": "q1",
            "question": "Pick one",
            "options": ["Only", "Three", "Options"],
            "correctAnswer": "A"
        }"#;
        assert!(serde_json::from_str::<QuizQuestion>(json).is_err());
    }
}
