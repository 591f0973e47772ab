//! Turn raw generation output into a validated [`GenerationResult`]
//!
//! Parsing runs an ordered chain of pure strategies and keeps the first JSON
//! object any of them recovers. Validation then checks the required lists and
//! assigns fresh ids to every generated item.

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use studycards_common::study::QUIZ_OPTION_COUNT;
use studycards_common::{
    AnswerLetter, Flashcard, GenerationResult, KeyConcept, QuizQuestion, Result, StudyCardsError,
};
use tracing::{debug, warn};
use uuid::Uuid;

/// Field holding the flashcard list
pub const FLASHCARDS_FIELD: &str = "flashcards";

/// Field holding the quiz question list
pub const QUIZ_QUESTIONS_FIELD: &str = "quizQuestions";

/// One way of locating a JSON object in raw output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// The whole payload is the object
    Strict,
    /// Interior of a ```json fenced block
    FencedBlock,
    /// A brace-delimited object somewhere in the text
    BraceObject,
}

impl ParseStrategy {
    /// Strategies in the order they are attempted
    pub const CHAIN: [ParseStrategy; 3] = [Self::Strict, Self::FencedBlock, Self::BraceObject];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::FencedBlock => "fenced_block",
            Self::BraceObject => "brace_object",
        }
    }

    /// Try this strategy alone. Only a JSON object counts as a match.
    pub fn extract(&self, raw: &str) -> Option<Map<String, Value>> {
        match self {
            Self::Strict => parse_object(raw.trim()),
            Self::FencedBlock => fenced_json_blocks(raw).find_map(parse_object),
            Self::BraceObject => brace_object_candidates(raw)
                .into_iter()
                .find_map(parse_object),
        }
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[ \t]*(?i:json)[ \t]*\r?\n(.*?)```").expect("fence pattern is valid")
    })
}

/// Interiors of every ```json block, in order of appearance
fn fenced_json_blocks(raw: &str) -> impl Iterator<Item = &str> {
    fence_regex()
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Top-level balanced `{...}` spans, in order, followed by the widest span
/// from the first `{` to the last `}`.
///
/// Braces inside JSON strings are ignored. The widest span covers output
/// where stray braces in surrounding prose break the balance.
fn brace_object_candidates(raw: &str) -> Vec<&str> {
    let mut candidates = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            // Quotes only open strings inside an object; prose quotes are ignored
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        candidates.push(&raw[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }

    if let (Some(first), Some(last)) = (raw.find('{'), raw.rfind('}')) {
        if first < last {
            let widest = &raw[first..=last];
            if !candidates.contains(&widest) {
                candidates.push(widest);
            }
        }
    }

    candidates
}

/// Run the strategy chain. First success wins.
pub fn parse_payload(raw: &str) -> Result<(ParseStrategy, Map<String, Value>)> {
    for strategy in ParseStrategy::CHAIN {
        match strategy.extract(raw) {
            Some(object) => {
                debug!("Parsed generation output with {} strategy", strategy.name());
                return Ok((strategy, object));
            }
            None => debug!("{} strategy found no JSON object", strategy.name()),
        }
    }

    warn!(
        "No JSON object recovered from generation output ({} chars): {}",
        raw.len(),
        raw
    );
    Err(StudyCardsError::malformed(raw))
}

#[derive(Debug, Deserialize)]
struct RawFlashcard {
    question: String,
    answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuizQuestion {
    question: String,
    options: [String; QUIZ_OPTION_COUNT],
    correct_answer: AnswerLetter,
}

/// Parse, validate and assign ids
pub fn normalize(raw: &str) -> Result<GenerationResult> {
    let (_, object) = parse_payload(raw)?;
    normalize_object(object)
}

/// Validate an already-parsed object and build the result
pub fn normalize_object(mut object: Map<String, Value>) -> Result<GenerationResult> {
    // Presence of both lists is checked before their contents
    let flashcards = take_array(&mut object, FLASHCARDS_FIELD)?;
    let quiz_questions = take_array(&mut object, QUIZ_QUESTIONS_FIELD)?;

    let flashcards: Vec<RawFlashcard> = serde_json::from_value(Value::Array(flashcards))
        .map_err(|e| {
            warn!("Flashcard entries do not match the expected shape: {}", e);
            StudyCardsError::invalid_shape(FLASHCARDS_FIELD)
        })?;

    let quiz_questions: Vec<RawQuizQuestion> =
        serde_json::from_value(Value::Array(quiz_questions)).map_err(|e| {
            warn!("Quiz entries do not match the expected shape: {}", e);
            StudyCardsError::invalid_shape(QUIZ_QUESTIONS_FIELD)
        })?;

    let summary = object
        .get("summary")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let key_concepts = match object.remove("keyConcepts") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<KeyConcept>(item).ok())
            .collect(),
        _ => Vec::new(),
    };

    let flashcards = flashcards
        .into_iter()
        .map(|card| Flashcard {
            id: new_item_id(),
            question: card.question,
            answer: card.answer,
        })
        .collect();

    let quiz_questions = quiz_questions
        .into_iter()
        .map(|q| QuizQuestion {
            id: new_item_id(),
            question: q.question,
            options: q.options,
            correct_answer: q.correct_answer,
        })
        .collect();

    Ok(GenerationResult {
        summary,
        key_concepts,
        flashcards,
        quiz_questions,
    })
}

fn take_array(object: &mut Map<String, Value>, field: &str) -> Result<Vec<Value>> {
    match object.remove(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => {
            warn!("`{}` is present but not a list", field);
            Err(StudyCardsError::invalid_shape(field))
        }
        None => Err(StudyCardsError::invalid_shape(field)),
    }
}

fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}
