//! Flashcard deck view model

use crate::models::{Flashcard, FlashcardData};

/// Walks a deck one card at a time, question side first
#[derive(Debug, Clone)]
pub struct FlashcardDeck<'a> {
    data: &'a FlashcardData,
    index: usize,
    flipped: bool,
}

impl<'a> FlashcardDeck<'a> {
    pub fn new(data: &'a FlashcardData) -> Self {
        Self {
            data,
            index: 0,
            flipped: false,
        }
    }

    pub fn title(&self) -> &'a str {
        &self.data.title
    }

    pub fn len(&self) -> usize {
        self.data.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.cards.is_empty()
    }

    /// Card under the cursor; `None` for an empty deck
    pub fn current(&self) -> Option<&'a Flashcard> {
        self.data.cards.get(self.index)
    }

    /// One-based position, e.g. `(2, 10)` for "card 2 of 10"
    pub fn position(&self) -> (usize, usize) {
        if self.is_empty() {
            (0, 0)
        } else {
            (self.index + 1, self.len())
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        if !self.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    /// Text on the visible side of the current card
    pub fn visible_text(&self) -> Option<&'a str> {
        self.current().map(|card| {
            if self.flipped {
                card.answer.as_str()
            } else {
                card.question.as_str()
            }
        })
    }

    /// Move to the next card (question side up); false at the last card
    pub fn next(&mut self) -> bool {
        if self.index + 1 >= self.len() {
            return false;
        }
        self.index += 1;
        self.flipped = false;
        true
    }

    /// Move to the previous card (question side up); false at the first card
    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.flipped = false;
        true
    }
}
