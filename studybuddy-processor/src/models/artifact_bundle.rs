//! Artifact bundle returned by the processing service
//!
//! The bundle is all-or-nothing: it is only ever exposed after every field
//! decoded and [`ArtifactBundle::validate`] passed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Bundle decoding and validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Duplicate flashcard id {0}")]
    DuplicateFlashcardId(u64),

    #[error("Duplicate quiz question id {0}")]
    DuplicateQuestionId(u64),

    #[error("Quiz question {question_id} has no options")]
    NoOptions { question_id: u64 },

    #[error("Quiz question {question_id} marks option {index} correct but has only {options} options")]
    CorrectAnswerOutOfRange {
        question_id: u64,
        index: usize,
        options: usize,
    },

    #[error("Invalid audio URL '{url}': {reason}")]
    InvalidAudioUrl { url: String, reason: String },
}

/// The four study artifacts produced from one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactBundle {
    pub study_guide: StudyGuideData,
    pub flashcards: FlashcardData,
    pub quiz: QuizData,
    pub audio: AudioData,
}

/// Study guide: titled, ordered sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyGuideData {
    pub title: String,
    /// Sections in reading order
    pub content: Vec<StudyGuideSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGuideSection {
    /// Section heading
    pub section: String,
    pub key_points: Vec<String>,
    pub summary: String,
}

/// Flashcard deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardData {
    pub title: String,
    pub cards: Vec<Flashcard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Unique within the deck
    pub id: u64,
    pub question: String,
    pub answer: String,
}

/// Multiple-choice quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizData {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// Unique within the quiz
    pub id: u64,
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`
    pub correct_answer_index: usize,
}

impl QuizQuestion {
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_answer_index
    }
}

/// Audio narration reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioData {
    pub title: String,
    pub audio_url: String,
}

impl AudioData {
    /// Parse `audio_url` as an absolute URL
    pub fn parsed_url(&self) -> Result<reqwest::Url, BundleError> {
        reqwest::Url::parse(&self.audio_url).map_err(|e| BundleError::InvalidAudioUrl {
            url: self.audio_url.clone(),
            reason: e.to_string(),
        })
    }
}

impl ArtifactBundle {
    /// Decode and validate a bundle from JSON
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        let bundle: ArtifactBundle =
            serde_json::from_str(json).map_err(|e| BundleError::Decode(e.to_string()))?;
        bundle.validate()?;
        Ok(bundle)
    }

    /// Check the cross-field rules serde cannot express
    ///
    /// Empty section, card and question lists are accepted.
    pub fn validate(&self) -> Result<(), BundleError> {
        let mut card_ids = HashSet::new();
        for card in &self.flashcards.cards {
            if !card_ids.insert(card.id) {
                return Err(BundleError::DuplicateFlashcardId(card.id));
            }
        }

        let mut question_ids = HashSet::new();
        for question in &self.quiz.questions {
            if !question_ids.insert(question.id) {
                return Err(BundleError::DuplicateQuestionId(question.id));
            }
            if question.options.is_empty() {
                return Err(BundleError::NoOptions {
                    question_id: question.id,
                });
            }
            if question.correct_answer_index >= question.options.len() {
                return Err(BundleError::CorrectAnswerOutOfRange {
                    question_id: question.id,
                    index: question.correct_answer_index,
                    options: question.options.len(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_BUNDLE_JSON: &str = r#"{
        "studyGuide": {
            "title": "Cell Biology",
            "content": [
                {
                    "section": "Organelles",
                    "keyPoints": ["Mitochondria produce ATP", "Ribosomes build proteins"],
                    "summary": "Organelles divide the work of the cell."
                },
                {
                    "section": "Membranes",
                    "keyPoints": ["Phospholipid bilayer"],
                    "summary": "Membranes control what enters the cell."
                }
            ]
        },
        "flashcards": {
            "title": "Cell Biology Flashcards",
            "cards": [
                {"id": 1, "question": "Powerhouse of the cell?", "answer": "Mitochondria"},
                {"id": 2, "question": "Protein factory?", "answer": "Ribosome"}
            ]
        },
        "quiz": {
            "title": "Cell Biology Quiz",
            "questions": [
                {"id": 1, "question": "Which organelle makes ATP?", "options": ["Nucleus", "Mitochondria", "Golgi"], "correctAnswerIndex": 1},
                {"id": 2, "question": "Membranes are made of?", "options": ["Phospholipids", "Starch"], "correctAnswerIndex": 0}
            ]
        },
        "audio": {
            "title": "Cell Biology Narration",
            "audioUrl": "https://cdn.example.com/audio/cells.mp3"
        }
    }"#;

    pub(crate) fn sample_bundle() -> ArtifactBundle {
        ArtifactBundle::from_json(SAMPLE_BUNDLE_JSON).unwrap()
    }

    #[test]
    fn test_decodes_camel_case_wire_format() {
        let bundle = sample_bundle();
        assert_eq!(bundle.study_guide.content.len(), 2);
        assert_eq!(bundle.study_guide.content[0].key_points.len(), 2);
        assert_eq!(bundle.flashcards.cards.len(), 2);
        assert_eq!(bundle.quiz.questions[0].correct_answer_index, 1);
        assert_eq!(bundle.audio.audio_url, "https://cdn.example.com/audio/cells.mp3");

        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json["studyGuide"]["content"][0]["keyPoints"].is_array());
        assert_eq!(json["quiz"]["questions"][1]["correctAnswerIndex"], 0);
    }

    #[test]
    fn test_missing_field_is_decode_error() {
        let err = ArtifactBundle::from_json(r#"{"studyGuide": {"title": "x", "content": []}}"#)
            .unwrap_err();
        assert!(matches!(err, BundleError::Decode(_)));
    }

    #[test]
    fn test_duplicate_flashcard_id_rejected() {
        let mut bundle = sample_bundle();
        bundle.flashcards.cards[1].id = 1;
        assert_eq!(bundle.validate(), Err(BundleError::DuplicateFlashcardId(1)));
    }

    #[test]
    fn test_duplicate_question_id_rejected() {
        let mut bundle = sample_bundle();
        bundle.quiz.questions[1].id = 1;
        assert_eq!(bundle.validate(), Err(BundleError::DuplicateQuestionId(1)));
    }

    #[test]
    fn test_correct_answer_must_index_an_option() {
        let mut bundle = sample_bundle();
        bundle.quiz.questions[1].correct_answer_index = 2;
        assert_eq!(
            bundle.validate(),
            Err(BundleError::CorrectAnswerOutOfRange {
                question_id: 2,
                index: 2,
                options: 2
            })
        );

        bundle.quiz.questions[1].options.clear();
        assert_eq!(
            bundle.validate(),
            Err(BundleError::NoOptions { question_id: 2 })
        );
    }

    #[test]
    fn test_relative_audio_url_is_kept_verbatim() {
        let json = SAMPLE_BUNDLE_JSON.replace(
            "https://cdn.example.com/audio/cells.mp3",
            "/storage/v1/object/public/audio/notes.mp3",
        );
        let bundle = ArtifactBundle::from_json(&json).unwrap();
        assert_eq!(bundle.audio.audio_url, "/storage/v1/object/public/audio/notes.mp3");

        // Only playback needs an absolute URL
        assert!(matches!(
            bundle.audio.parsed_url(),
            Err(BundleError::InvalidAudioUrl { .. })
        ));
    }

    #[test]
    fn test_empty_lists_are_valid() {
        let mut bundle = sample_bundle();
        bundle.study_guide.content.clear();
        bundle.flashcards.cards.clear();
        bundle.quiz.questions.clear();
        assert!(bundle.validate().is_ok());
    }
}
