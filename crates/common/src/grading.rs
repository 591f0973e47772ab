use serde::{Deserialize, Serialize};

use crate::study::{AnswerLetter, QuizQuestion};

/// Outcome of a single answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: String,
    /// Zero-based option chosen by the user, if any
    pub selected: Option<usize>,
    pub correct_answer: AnswerLetter,
    pub is_correct: bool,
}

/// Score for a whole quiz attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent
    pub percentage: u32,
    pub results: Vec<QuestionResult>,
}

/// Grade zero-based option selections against a quiz.
///
/// `answers[i]` is the selection for `questions[i]`. Missing entries, `None`
/// and out-of-range indices count as wrong; extra answers are ignored.
pub fn grade_quiz(questions: &[QuizQuestion], answers: &[Option<usize>]) -> QuizScore {
    let results: Vec<QuestionResult> = questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let selected = answers.get(i).copied().flatten();
            QuestionResult {
                question_id: question.id.clone(),
                selected,
                correct_answer: question.correct_answer,
                is_correct: selected.map(|s| question.is_correct(s)).unwrap_or(false),
            }
        })
        .collect();

    let correct = results.iter().filter(|r| r.is_correct).count();
    let total = questions.len();
    let percentage = if total == 0 {
        0
    } else {
        ((correct as f64 / total as f64) * 100.0).round() as u32
    };

    QuizScore {
        correct,
        total,
        percentage,
        results,
    }
}
