//! Recorded video lectures.

use super::validation::{require_class, ValidationError};
use super::ClassNumber;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoLecture {
    /// Overwritten by the store on creation.
    pub video_id: String,
    #[serde(rename = "class")]
    pub class: ClassNumber,
    pub title: String,
    pub description: String,
    pub video_url: String,
    /// Stamped by the store on creation.
    pub uploaded_at: DateTime<Utc>,
}

impl VideoLecture {
    /// Builds a video draft; id and upload time are assigned by `create_video`.
    pub fn draft(
        class: ClassNumber,
        title: impl Into<String>,
        description: impl Into<String>,
        video_url: impl Into<String>,
    ) -> Self {
        Self {
            video_id: String::new(),
            class,
            title: title.into(),
            description: description.into(),
            video_url: video_url.into(),
            uploaded_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_class(self.class)
    }
}
