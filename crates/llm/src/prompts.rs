//! Prompt templates for study material generation

use studycards_common::study::KEY_CONCEPT_COUNT;
use studycards_common::GenerationRequest;

/// Role and ground rules shared by every generation prompt
pub const BASE_PROMPT: &str = r#"You are an expert educational content creator and summarizer. Analyze the lesson text below and:

1. FIRST, write a summary that captures the main ideas
2. THEN, identify the most important key concepts
3. FINALLY, write flashcards and quiz questions based on the summary and key concepts

Do NOT copy text from the lesson. Synthesize the information in your own words and write original questions that test understanding."#;

/// JSON shape the model must reply with
pub const RESPONSE_FORMAT: &str = r#"{
  "summary": "Summary of the lesson in 2-3 paragraphs",
  "keyConcepts": [
    { "concept": "Concept name", "explanation": "Brief explanation of the concept" }
  ],
  "flashcards": [
    { "id": 1, "question": "Question text", "answer": "Answer text" }
  ],
  "quizQuestions": [
    {
      "id": 1,
      "question": "Quiz question text",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": "A"
    }
  ]
}"#;

/// Build the prompt for one generation request.
///
/// Output depends only on the request, so equal requests give equal prompts.
pub fn generation_prompt(request: &GenerationRequest) -> String {
    let flashcards = request.flashcard_count();
    let quiz = request.quiz_count();

    format!(
        r#"{base}

For the summary:
- Write a concise but complete overview (2-3 paragraphs)
- Focus on the main ideas, not minor details

For key concepts:
- Identify exactly {concepts} key ideas, principles, or terms
- Give a brief explanation for each

For flashcards:
- Create exactly {flashcards} flashcards
- Mix question types: definition, application, comparison, analysis
- Answers should explain the concept clearly

For quiz questions:
- Create exactly {quiz} quiz questions
- Each question has exactly 4 options
- "correctAnswer" is the letter of the correct option: "A", "B", "C" or "D" (A is the first option)
- Options must be plausible but clearly distinguishable

Lesson text:
---
{text}
---

Respond with a single JSON object in exactly this format and nothing else:
{format}"#,
        base = BASE_PROMPT,
        concepts = KEY_CONCEPT_COUNT,
        flashcards = flashcards,
        quiz = quiz,
        text = request.lesson_text(),
        format = RESPONSE_FORMAT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_counts() {
        let request = GenerationRequest::new("Mitochondria produce ATP.", 10, 3).unwrap();
        let prompt = generation_prompt(&request);
        assert!(prompt.contains("exactly 10 flashcards"));
        assert!(prompt.contains("exactly 3 quiz questions"));
        assert!(prompt.contains("exactly 5 key ideas"));
        assert!(prompt.contains("Mitochondria produce ATP."));
        assert!(prompt.contains("\"correctAnswer\": \"A\""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = GenerationRequest::new("Water boils at 100C at sea level.", 5, 5).unwrap();
        assert_eq!(generation_prompt(&request), generation_prompt(&request.clone()));
    }

    #[test]
    fn test_response_format_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(RESPONSE_FORMAT).unwrap();
        assert!(value["flashcards"].is_array());
        assert!(value["quizQuestions"].is_array());
    }
}
