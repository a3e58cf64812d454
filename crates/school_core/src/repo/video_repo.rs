//! Video lecture repository contract and snapshot implementation.

use super::{EntityKind, RepoError, RepoResult};
use crate::clock::Clock;
use crate::ids::{allocate_timestamp_id, VIDEO_ID_PREFIX};
use crate::model::video::VideoLecture;
use crate::model::ClassNumber;
use crate::store::school_store::SchoolStore;
use crate::store::storage::SnapshotStorage;

pub trait VideoRepository {
    /// Stores a video with an allocated `video_<millis>` id and `uploaded_at = now`.
    fn create_video(&self, video: &VideoLecture) -> RepoResult<String>;
    fn delete_video(&self, video_id: &str) -> RepoResult<()>;
    fn list_videos(&self) -> Vec<VideoLecture>;
    fn list_videos_by_class(&self, class: ClassNumber) -> Vec<VideoLecture>;
}

impl<S: SnapshotStorage, C: Clock> VideoRepository for SchoolStore<S, C> {
    fn create_video(&self, video: &VideoLecture) -> RepoResult<String> {
        video.validate()?;
        self.write("video_create", |snapshot, now| {
            let video_id = allocate_timestamp_id(
                VIDEO_ID_PREFIX,
                now,
                snapshot.videos.iter().map(|existing| existing.video_id.as_str()),
            );
            let mut stored = video.clone();
            stored.video_id = video_id.clone();
            stored.uploaded_at = now;
            snapshot.videos.push(stored);
            Ok(video_id)
        })
    }

    fn delete_video(&self, video_id: &str) -> RepoResult<()> {
        self.write("video_delete", |snapshot, _| {
            let before = snapshot.videos.len();
            snapshot.videos.retain(|video| video.video_id != video_id);
            if snapshot.videos.len() == before {
                return Err(RepoError::not_found(EntityKind::Video, video_id));
            }
            Ok(())
        })
    }

    fn list_videos(&self) -> Vec<VideoLecture> {
        self.read(|snapshot| snapshot.videos.clone())
    }

    fn list_videos_by_class(&self, class: ClassNumber) -> Vec<VideoLecture> {
        self.read(|snapshot| {
            snapshot
                .videos
                .iter()
                .filter(|video| video.class == class)
                .cloned()
                .collect()
        })
    }
}
