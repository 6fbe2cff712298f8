//! Artifact presenter
//!
//! Switches between the four views of one immutable bundle. Selecting a
//! view never re-fetches or mutates anything; every view borrows its own
//! sub-object of the same bundle.

pub mod audio;
pub mod flashcards;
pub mod quiz;
pub mod render;

pub use audio::AudioTrack;
pub use flashcards::FlashcardDeck;
pub use quiz::{QuizError, QuizScore, QuizSession};

use crate::models::{ArtifactBundle, AudioData, FlashcardData, QuizData, StudyGuideData};
use crate::services::notifier::{self, NotificationSink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four artifact views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactView {
    #[default]
    StudyGuide,
    Flashcards,
    Quiz,
    Audio,
}

impl ArtifactView {
    /// All views in tab order
    pub const ALL: [ArtifactView; 4] = [
        ArtifactView::StudyGuide,
        ArtifactView::Flashcards,
        ArtifactView::Quiz,
        ArtifactView::Audio,
    ];

    /// Stable identifier
    pub fn id(&self) -> &'static str {
        match self {
            ArtifactView::StudyGuide => "study-guide",
            ArtifactView::Flashcards => "flashcards",
            ArtifactView::Quiz => "quiz",
            ArtifactView::Audio => "audio",
        }
    }

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactView::StudyGuide => "Study Guide",
            ArtifactView::Flashcards => "Flashcards",
            ArtifactView::Quiz => "Quiz",
            ArtifactView::Audio => "Audio",
        }
    }
}

impl fmt::Display for ArtifactView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ArtifactView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactView::ALL
            .into_iter()
            .find(|view| view.id() == s)
            .ok_or_else(|| {
                format!(
                    "unknown view '{}' (expected one of: study-guide, flashcards, quiz, audio)",
                    s
                )
            })
    }
}

/// Content of one view, borrowed from the bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewContent<'a> {
    StudyGuide(&'a StudyGuideData),
    Flashcards(&'a FlashcardData),
    Quiz(&'a QuizData),
    Audio(&'a AudioData),
}

impl<'a> ViewContent<'a> {
    pub fn view(&self) -> ArtifactView {
        match self {
            ViewContent::StudyGuide(_) => ArtifactView::StudyGuide,
            ViewContent::Flashcards(_) => ArtifactView::Flashcards,
            ViewContent::Quiz(_) => ArtifactView::Quiz,
            ViewContent::Audio(_) => ArtifactView::Audio,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            ViewContent::StudyGuide(data) => &data.title,
            ViewContent::Flashcards(data) => &data.title,
            ViewContent::Quiz(data) => &data.title,
            ViewContent::Audio(data) => &data.title,
        }
    }
}

/// Read-only view switcher over a completed run's bundle
#[derive(Debug, Clone)]
pub struct ArtifactPresenter<'a> {
    bundle: &'a ArtifactBundle,
    selected: ArtifactView,
}

impl<'a> ArtifactPresenter<'a> {
    /// Presenter starting on the study guide
    pub fn new(bundle: &'a ArtifactBundle) -> Self {
        Self {
            bundle,
            selected: ArtifactView::default(),
        }
    }

    pub fn bundle(&self) -> &'a ArtifactBundle {
        self.bundle
    }

    pub fn selected(&self) -> ArtifactView {
        self.selected
    }

    pub fn select(&mut self, view: ArtifactView) {
        self.selected = view;
    }

    /// Content of the selected view
    pub fn current(&self) -> ViewContent<'a> {
        self.view(self.selected)
    }

    /// Content of any view, regardless of selection
    pub fn view(&self, view: ArtifactView) -> ViewContent<'a> {
        match view {
            ArtifactView::StudyGuide => ViewContent::StudyGuide(&self.bundle.study_guide),
            ArtifactView::Flashcards => ViewContent::Flashcards(&self.bundle.flashcards),
            ArtifactView::Quiz => ViewContent::Quiz(&self.bundle.quiz),
            ArtifactView::Audio => ViewContent::Audio(&self.bundle.audio),
        }
    }

    pub fn flashcard_deck(&self) -> FlashcardDeck<'a> {
        FlashcardDeck::new(&self.bundle.flashcards)
    }

    pub fn quiz_session(&self) -> QuizSession<'a> {
        QuizSession::new(&self.bundle.quiz)
    }

    pub fn audio_track(&self) -> Result<AudioTrack, crate::models::BundleError> {
        AudioTrack::from_data(&self.bundle.audio)
    }

    /// Surface a finished quiz as a notification
    ///
    /// The bundle is not touched.
    pub fn report_quiz_completion(&self, score: QuizScore, sink: &dyn NotificationSink) {
        tracing::info!(score = score.score, total = score.total, "Quiz completed");
        sink.notify(notifier::quiz_completed(score.score, score.total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact_bundle::tests::sample_bundle;
    use std::sync::Mutex;
    use studybuddy_common::events::Notification;

    #[derive(Default)]
    struct Capture(Mutex<Vec<Notification>>);

    impl NotificationSink for Capture {
        fn notify(&self, notification: Notification) {
            self.0.lock().unwrap().push(notification);
        }
    }

    #[test]
    fn test_default_view_is_study_guide() {
        let bundle = sample_bundle();
        let presenter = ArtifactPresenter::new(&bundle);
        assert_eq!(presenter.selected(), ArtifactView::StudyGuide);
        assert_eq!(presenter.current().title(), "Cell Biology");
    }

    #[test]
    fn test_view_ids_round_trip_through_from_str() {
        for view in ArtifactView::ALL {
            assert_eq!(view.id().parse::<ArtifactView>().unwrap(), view);
        }
        assert!("slides".parse::<ArtifactView>().is_err());
    }

    #[test]
    fn test_switching_views_never_changes_bundle() {
        let bundle = sample_bundle();
        let snapshot = bundle.clone();
        let mut presenter = ArtifactPresenter::new(&bundle);

        let sequence = [
            ArtifactView::Quiz,
            ArtifactView::Audio,
            ArtifactView::Quiz,
            ArtifactView::Flashcards,
            ArtifactView::StudyGuide,
            ArtifactView::Audio,
            ArtifactView::Flashcards,
        ];
        for view in sequence.iter().cycle().take(50) {
            presenter.select(*view);
            assert_eq!(presenter.current().view(), *view);
        }

        assert!(std::ptr::eq(presenter.bundle(), &bundle));
        assert_eq!(bundle, snapshot);
    }

    #[test]
    fn test_views_are_bound_to_their_own_sub_objects() {
        let bundle = sample_bundle();
        let presenter = ArtifactPresenter::new(&bundle);

        match presenter.view(ArtifactView::Flashcards) {
            ViewContent::Flashcards(data) => assert_eq!(data.cards.len(), 2),
            other => panic!("wrong content: {:?}", other),
        }
        match presenter.view(ArtifactView::StudyGuide) {
            ViewContent::StudyGuide(data) => assert_eq!(data.content.len(), 2),
            other => panic!("wrong content: {:?}", other),
        }
        assert_eq!(presenter.view(ArtifactView::Audio).title(), "Cell Biology Narration");
    }

    #[test]
    fn test_quiz_completion_notifies_without_mutation() {
        let bundle = sample_bundle();
        let quiz_before = bundle.quiz.clone();
        let presenter = ArtifactPresenter::new(&bundle);
        let sink = Capture::default();

        presenter.report_quiz_completion(QuizScore { score: 3, total: 5 }, &sink);

        let notifications = sink.0.lock().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Quiz Completed");
        assert!(notifications[0].description.contains('3'));
        assert!(notifications[0].description.contains('5'));
        assert!(!notifications[0].is_destructive());
        assert_eq!(bundle.quiz, quiz_before);
    }
}
