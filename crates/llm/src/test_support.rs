use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use studycards_common::{Result, StudyCardsError};

use crate::llm_trait::GenerationBackend;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Status(u16, String),
}

/// Backend returning a canned reply and recording every call
#[derive(Debug)]
pub struct StubBackend {
    reply: Reply,
    configured: bool,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StubBackend {
    /// Reply with raw text
    pub fn text(raw: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(raw.into()))
    }

    /// Reply as if the service answered with a non-success status
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::with_reply(Reply::Status(status, body.into()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            configured: true,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Report no credential
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt of the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.reply {
            Reply::Text(raw) => Ok(raw.clone()),
            Reply::Status(status, body) => Err(StudyCardsError::service(*status, body.clone())),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Well-formed generation output with the given item counts.
///
/// Item ids are small integers repeated across both lists, the way models
/// usually number them.
pub fn sample_payload(flashcards: usize, quiz_questions: usize) -> String {
    let letters = ["A", "B", "C", "D"];

    let cards: Vec<_> = (1..=flashcards)
        .map(|i| {
            json!({
                "id": i,
                "question": format!("What is step {} of photosynthesis?", i),
                "answer": format!("Step {} turns light into stored energy.", i),
            })
        })
        .collect();

    let questions: Vec<_> = (1..=quiz_questions)
        .map(|i| {
            json!({
                "id": i,
                "question": format!("Which statement about chlorophyll is true ({})?", i),
                "options": [
                    "It absorbs light",
                    "It stores water",
                    "It releases nitrogen",
                    "It breaks down glucose"
                ],
                "correctAnswer": letters[(i - 1) % letters.len()],
            })
        })
        .collect();

    let payload = json!({
        "summary": "Plants capture light energy and store it as chemical energy in glucose.",
        "keyConcepts": [
            { "concept": "Chlorophyll", "explanation": "Pigment that absorbs light." },
            { "concept": "Glucose", "explanation": "Sugar that stores chemical energy." }
        ],
        "flashcards": cards,
        "quizQuestions": questions,
    });

    serde_json::to_string_pretty(&payload).unwrap_or_default()
}
