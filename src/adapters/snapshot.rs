//! Evidentiary snapshot store.
//!
//! On a gesture dismissal the frame is kept in `images_dir` as
//! `hand_<unix-secs>_<seq>.<ext>`: the captured image when the feed
//! provided one, otherwise the landmark record as JSON. Storage failures
//! only warn; the dismissal goes ahead without a path.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::app::ports::SnapshotPort;
use crate::gesture::Frame;

use super::time::unix_secs;

pub struct SnapshotStore {
    dir: PathBuf,
    saved: u32,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn saved(&self) -> u32 {
        self.saved
    }

    fn target(&self, frame: &Frame, ext: &str) -> PathBuf {
        self.dir
            .join(format!("hand_{}_{}.{}", unix_secs(), frame.seq, ext))
    }

    fn store(&self, frame: &Frame) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        match &frame.image {
            Some(image) => {
                let ext = image
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("jpg");
                let target = self.target(frame, ext);
                std::fs::copy(image, &target)?;
                Ok(target)
            }
            None => {
                let target = self.target(frame, "json");
                let body = serde_json::to_vec(&frame.observation)?;
                std::fs::write(&target, body)?;
                Ok(target)
            }
        }
    }
}

impl SnapshotPort for SnapshotStore {
    fn persist(&mut self, frame: &Frame) -> Option<String> {
        match self.store(frame) {
            Ok(path) => {
                self.saved += 1;
                debug!("snapshot for frame {} at {}", frame.seq, path.display());
                Some(path.to_string_lossy().into_owned())
            }
            Err(e) => {
                warn!("snapshot for frame {} not saved: {}", frame.seq, e);
                None
            }
        }
    }
}
