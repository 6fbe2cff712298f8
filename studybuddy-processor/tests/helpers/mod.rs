//! Shared test helpers: a scripted processing service and a recording sink

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use studybuddy_common::events::Notification;
use studybuddy_processor::models::{ArtifactBundle, SelectedFile};
use studybuddy_processor::services::{NotificationSink, ProcessingService, ServiceError};

pub const BUNDLE_JSON: &str = r#"{
    "studyGuide": {
        "title": "Photosynthesis",
        "content": [
            {"section": "Light reactions", "keyPoints": ["Occur in thylakoids", "Produce ATP and NADPH"], "summary": "Light energy is captured."},
            {"section": "Calvin cycle", "keyPoints": ["Fixes CO2"], "summary": "Sugar is built."},
            {"section": "Factors", "keyPoints": ["Light", "CO2", "Temperature"], "summary": "Rate depends on limits."}
        ]
    },
    "flashcards": {
        "title": "Photosynthesis Flashcards",
        "cards": [
            {"id": 1, "question": "Where do light reactions occur?", "answer": "Thylakoid membranes"},
            {"id": 2, "question": "What does the Calvin cycle fix?", "answer": "Carbon dioxide"}
        ]
    },
    "quiz": {
        "title": "Photosynthesis Quiz",
        "questions": [
            {"id": 1, "question": "Main pigment?", "options": ["Chlorophyll", "Melanin"], "correctAnswerIndex": 0},
            {"id": 2, "question": "Gas released?", "options": ["CO2", "O2", "N2"], "correctAnswerIndex": 1},
            {"id": 3, "question": "Energy source?", "options": ["Light", "Heat"], "correctAnswerIndex": 0},
            {"id": 4, "question": "Product sugar?", "options": ["Glucose", "Lactose"], "correctAnswerIndex": 0},
            {"id": 5, "question": "Organelle?", "options": ["Chloroplast", "Nucleus"], "correctAnswerIndex": 0}
        ]
    },
    "audio": {"title": "Photosynthesis Narration", "audioUrl": "https://cdn.example.com/photosynthesis.mp3"}
}"#;

pub fn sample_bundle() -> ArtifactBundle {
    ArtifactBundle::from_json(BUNDLE_JSON).unwrap()
}

pub fn file_a() -> SelectedFile {
    SelectedFile::new("fileA.pdf", b"%PDF-1.4 lecture notes".to_vec())
}

pub fn file_b() -> SelectedFile {
    SelectedFile::new("fileB.txt", b"more notes".to_vec())
}

type Responder = dyn Fn() -> Result<ArtifactBundle, ServiceError> + Send + Sync;

/// Processing service returning scripted responses and recording calls
pub struct FakeService {
    responder: Box<Responder>,
    calls: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn new(
        responder: impl Fn() -> Result<ArtifactBundle, ServiceError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn returning(bundle: ArtifactBundle) -> Arc<Self> {
        Self::new(move || Ok(bundle.clone()))
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        Self::new(move || Err(ServiceError::Network(message.to_string())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessingService for FakeService {
    async fn process(&self, file: &SelectedFile) -> Result<ArtifactBundle, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(file.name().to_string());
        (self.responder)()
    }
}

/// Processing service whose call never completes
#[derive(Default)]
pub struct HangingService {
    calls: AtomicUsize,
}

impl HangingService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessingService for HangingService {
    async fn process(&self, _file: &SelectedFile) -> Result<ArtifactBundle, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

/// Notification sink that keeps everything it receives
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().unwrap().last().cloned()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
