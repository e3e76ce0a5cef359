//! Landmark frame feed.
//!
//! The vision capability writes one JSON record per processed frame:
//!
//! ```text
//! {"hand_present":true,"joints":[{"x":0.51,"y":0.82}, ...21],"image":"/tmp/f.jpg"}
//! ```
//!
//! [`FrameFeed`] reads them line by line and assigns sequence numbers.
//! A line that does not parse is skipped with a warning; end of input ends
//! the stream.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::PathBuf;

use log::{debug, warn};
use serde::Deserialize;

use crate::app::ports::FramePort;
use crate::error::HardwareFault;
use crate::gesture::{Frame, GestureObservation};

#[derive(Deserialize)]
struct FrameRecord {
    #[serde(flatten)]
    observation: GestureObservation,
    #[serde(default)]
    image: Option<PathBuf>,
}

pub struct FrameFeed<R> {
    reader: R,
    line: String,
    next_seq: u64,
    skipped: u64,
}

pub type BoxedFeed = FrameFeed<Box<dyn BufRead + Send>>;

impl BoxedFeed {
    /// `-` opens stdin, anything else a file or FIFO.
    pub fn open(source: &str) -> Result<Self, HardwareFault> {
        let reader: Box<dyn BufRead + Send> = if source == "-" {
            Box::new(BufReader::new(std::io::stdin()))
        } else {
            let file = File::open(source).map_err(|e| {
                warn!("frame source {} cannot be opened: {}", source, e);
                HardwareFault::CaptureUnavailable
            })?;
            Box::new(BufReader::new(file))
        };
        debug!("frame feed opened on {}", source);
        Ok(FrameFeed::new(reader))
    }
}

impl<R: BufRead> FrameFeed<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            next_seq: 0,
            skipped: 0,
        }
    }

    /// Lines dropped because they did not parse.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: BufRead> FramePort for FrameFeed<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, HardwareFault> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("frame feed read failed: {}", e);
                    return Err(HardwareFault::CaptureLost);
                }
            }

            let text = self.line.trim();
            if text.is_empty() {
                continue;
            }
            match serde_json::from_str::<FrameRecord>(text) {
                Ok(record) => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    return Ok(Some(Frame {
                        seq,
                        observation: record.observation,
                        image: record.image,
                    }));
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!("skipping malformed frame record: {}", e);
                }
            }
        }
    }
}
