use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use studycards_common::{GenerationResult, Result, StudyCardsError};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::types::{FlashcardSet, LibraryKind, QuizSet, SavedResult};

/// File holding saved flashcard sets
pub const FLASHCARDS_FILE: &str = "flashcards.json";

/// File holding saved quizzes
pub const QUIZZES_FILE: &str = "quizzes.json";

/// Persistence seam for generated material
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Store a result as one flashcard set and one quiz
    async fn save_result(&self, result: &GenerationResult) -> Result<SavedResult>;

    /// All flashcard sets, newest first
    async fn list_flashcard_sets(&self) -> Result<Vec<FlashcardSet>>;

    /// All quizzes, newest first
    async fn list_quizzes(&self) -> Result<Vec<QuizSet>>;

    async fn get_flashcard_set(&self, id: &str) -> Result<Option<FlashcardSet>>;

    async fn get_quiz(&self, id: &str) -> Result<Option<QuizSet>>;

    /// Replace the summary of a stored entry
    async fn update_summary(&self, kind: LibraryKind, id: &str, summary: &str) -> Result<()>;

    /// Remove a stored entry
    async fn delete(&self, kind: LibraryKind, id: &str) -> Result<()>;
}

trait LibraryRecord: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    /// Store a new summary, returning the previous one
    fn replace_summary(&mut self, summary: String) -> String;
}

impl LibraryRecord for FlashcardSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn replace_summary(&mut self, summary: String) -> String {
        std::mem::replace(&mut self.summary, summary)
    }
}

impl LibraryRecord for QuizSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn replace_summary(&mut self, summary: String) -> String {
        std::mem::replace(&mut self.summary, summary)
    }
}

/// One collection backed by a JSON file
struct Collection<T> {
    records: Vec<T>,
    file_path: PathBuf,
}

impl<T: LibraryRecord> Collection<T> {
    fn load(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let data = fs::read_to_string(path)?;
            if data.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&data).map_err(|e| {
                    StudyCardsError::Other(anyhow!(
                        "Library file {} is corrupt: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            records,
            file_path: path.to_path_buf(),
        })
    }

    fn newest_first(&self) -> Vec<T> {
        // Reverse first so records sharing a timestamp keep newest-first order
        let mut records: Vec<T> = self.records.iter().rev().cloned().collect();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        records
    }

    fn get(&self, id: &str) -> Option<T> {
        self.records.iter().find(|r| r.id() == id).cloned()
    }

    fn insert(&mut self, record: T) -> Result<()> {
        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<Option<T>> {
        let Some(pos) = self.records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let removed = self.records.remove(pos);
        if let Err(e) = self.save() {
            self.records.insert(pos, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    fn update_summary(&mut self, id: &str, summary: &str) -> Result<bool> {
        let Some(pos) = self.records.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        let previous = self.records[pos].replace_summary(summary.to_string());
        if let Err(e) = self.save() {
            self.records[pos].replace_summary(previous);
            return Err(e);
        }
        Ok(true)
    }

    /// Write to a sibling temp file, then rename over the original
    fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.records)?;
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

/// Library store keeping each collection in a pretty-printed JSON file
pub struct JsonLibraryStore {
    flashcards: RwLock<Collection<FlashcardSet>>,
    quizzes: RwLock<Collection<QuizSet>>,
}

impl JsonLibraryStore {
    /// Open (or create) the library under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let flashcards: Collection<FlashcardSet> = Collection::load(&data_dir.join(FLASHCARDS_FILE))?;
        let quizzes: Collection<QuizSet> = Collection::load(&data_dir.join(QUIZZES_FILE))?;

        info!(
            "Library opened at {} - {} flashcard sets, {} quizzes",
            data_dir.display(),
            flashcards.records.len(),
            quizzes.records.len()
        );

        Ok(Self {
            flashcards: RwLock::new(flashcards),
            quizzes: RwLock::new(quizzes),
        })
    }
}

#[async_trait]
impl ResultStore for JsonLibraryStore {
    async fn save_result(&self, result: &GenerationResult) -> Result<SavedResult> {
        let created_at = Utc::now();

        let flashcard_set = FlashcardSet {
            id: Uuid::new_v4().to_string(),
            created_at,
            summary: result.summary.clone(),
            key_concepts: result.key_concepts.clone(),
            flashcards: result.flashcards.clone(),
            total_flashcards: result.flashcards.len(),
        };
        let quiz = QuizSet {
            id: Uuid::new_v4().to_string(),
            created_at,
            summary: result.summary.clone(),
            key_concepts: result.key_concepts.clone(),
            questions: result.quiz_questions.clone(),
            total_questions: result.quiz_questions.len(),
        };

        let saved = SavedResult {
            flashcard_set_id: flashcard_set.id.clone(),
            quiz_id: quiz.id.clone(),
            created_at,
        };

        let mut flashcards = self.flashcards.write().await;
        flashcards.insert(flashcard_set)?;

        let mut quizzes = self.quizzes.write().await;
        if let Err(e) = quizzes.insert(quiz) {
            // Keep the pair together: undo the flashcard set
            warn!("Failed to save quiz, rolling back flashcard set: {}", e);
            if let Err(rollback) = flashcards.remove(&saved.flashcard_set_id) {
                warn!("Rollback of flashcard set failed: {}", rollback);
            }
            return Err(e);
        }

        info!(
            "Saved flashcard set {} ({} cards) and quiz {} ({} questions)",
            saved.flashcard_set_id,
            result.flashcards.len(),
            saved.quiz_id,
            result.quiz_questions.len()
        );

        Ok(saved)
    }

    async fn list_flashcard_sets(&self) -> Result<Vec<FlashcardSet>> {
        Ok(self.flashcards.read().await.newest_first())
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizSet>> {
        Ok(self.quizzes.read().await.newest_first())
    }

    async fn get_flashcard_set(&self, id: &str) -> Result<Option<FlashcardSet>> {
        Ok(self.flashcards.read().await.get(id))
    }

    async fn get_quiz(&self, id: &str) -> Result<Option<QuizSet>> {
        Ok(self.quizzes.read().await.get(id))
    }

    async fn update_summary(&self, kind: LibraryKind, id: &str, summary: &str) -> Result<()> {
        let updated = match kind {
            LibraryKind::Flashcards => self.flashcards.write().await.update_summary(id, summary)?,
            LibraryKind::Quizzes => self.quizzes.write().await.update_summary(id, summary)?,
        };

        if !updated {
            return Err(StudyCardsError::not_found(format!("{} {}", kind, id)));
        }
        info!("Updated summary of {} {}", kind, id);
        Ok(())
    }

    async fn delete(&self, kind: LibraryKind, id: &str) -> Result<()> {
        let removed = match kind {
            LibraryKind::Flashcards => self.flashcards.write().await.remove(id)?.is_some(),
            LibraryKind::Quizzes => self.quizzes.write().await.remove(id)?.is_some(),
        };

        if !removed {
            return Err(StudyCardsError::not_found(format!("{} {}", kind, id)));
        }
        info!("Deleted {} {}", kind, id);
        Ok(())
    }
}
