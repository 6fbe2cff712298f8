//! Audio narration view model

use crate::models::{AudioData, BundleError};

/// A playable narration handed to a playback collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTrack {
    pub title: String,
    pub url: reqwest::Url,
}

impl AudioTrack {
    pub fn from_data(data: &AudioData) -> Result<Self, BundleError> {
        Ok(Self {
            title: data.title.clone(),
            url: data.parsed_url()?,
        })
    }

    /// File name at the end of the URL path, if any
    pub fn file_name(&self) -> Option<&str> {
        self.url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
    }
}
