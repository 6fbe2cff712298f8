//! Plain-text rendering for the terminal front-end

use super::ViewContent;
use crate::models::{AudioData, FlashcardData, QuizData, StudyGuideData};
use std::fmt::Write;
use studybuddy_common::events::ProcessingStage;

/// Progress line, e.g. `[2/4] Uploading document`
pub fn render_progress(stage: ProcessingStage) -> String {
    format!("[{}/{}] {}", stage.step(), ProcessingStage::COUNT, stage.label())
}

pub fn render_view(content: ViewContent<'_>) -> String {
    match content {
        ViewContent::StudyGuide(data) => render_study_guide(data),
        ViewContent::Flashcards(data) => render_flashcards(data),
        ViewContent::Quiz(data) => render_quiz(data),
        ViewContent::Audio(data) => render_audio(data),
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
}

pub fn render_study_guide(data: &StudyGuideData) -> String {
    let mut out = String::new();
    heading(&mut out, &data.title);
    for section in &data.content {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", section.section);
        for point in &section.key_points {
            let _ = writeln!(out, "  - {}", point);
        }
        let _ = writeln!(out, "  {}", section.summary);
    }
    out
}

pub fn render_flashcards(data: &FlashcardData) -> String {
    let mut out = String::new();
    heading(&mut out, &data.title);
    let total = data.cards.len();
    for (index, card) in data.cards.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Card {} of {}", index + 1, total);
        let _ = writeln!(out, "  Q: {}", card.question);
        let _ = writeln!(out, "  A: {}", card.answer);
    }
    out
}

/// Questions and options only; answers stay hidden
pub fn render_quiz(data: &QuizData) -> String {
    let mut out = String::new();
    heading(&mut out, &data.title);
    for (index, question) in data.questions.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {}", index + 1, question.question);
        for (option_index, option) in question.options.iter().enumerate() {
            let _ = writeln!(out, "   {}) {}", option_index + 1, option);
        }
    }
    out
}

pub fn render_audio(data: &AudioData) -> String {
    let mut out = String::new();
    heading(&mut out, &data.title);
    let _ = writeln!(out, "Narration: {}", data.audio_url);
    out
}
