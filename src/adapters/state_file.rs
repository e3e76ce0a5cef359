//! Shared state file adapter.
//!
//! The backend mirrors its alarm state into a JSON file the gesture host
//! re-reads on every poll. A file that does not exist yet means
//! `monitoring: false`; that case is logged once per transition, not per
//! poll. A file that exists but cannot be read or parsed counts as an
//! unreachable authority, so the last known alarm state sticks.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::AlarmSignalPort;
use crate::error::AuthorityError;
use crate::monitor::AlarmSignal;

pub struct StateFileSource {
    path: PathBuf,
    /// `Some(true)` while the file is known to be missing.
    missing: Option<bool>,
}

impl StateFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            missing: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn note_missing(&mut self, missing: bool) {
        if self.missing == Some(missing) {
            return;
        }
        if missing {
            warn!(
                "state file {} does not exist, treating as monitoring=false",
                self.path.display()
            );
        } else if self.missing.is_some() {
            info!("state file {} appeared", self.path.display());
        }
        self.missing = Some(missing);
    }
}

impl AlarmSignalPort for StateFileSource {
    fn fetch(&mut self) -> Result<AlarmSignal, AuthorityError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.note_missing(true);
                return Ok(AlarmSignal::idle());
            }
            Err(_) => return Err(AuthorityError::Connect),
        };
        self.note_missing(false);
        serde_json::from_slice(&bytes).map_err(|_| AuthorityError::Malformed)
    }
}
