//! Replay of recorded detections.
//!
//! One line per frame, each a JSON array of
//! `{"id": 12, "corners": [[x, y], [x, y], [x, y], [x, y]]}` in detection
//! order. A blank line is a frame with no detections.

use super::FrameSource;
use crate::{
    error::{Error, Result},
    frame::Detections,
};
use log::info;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Reads frames from a JSON-lines reader
pub struct ReplaySource<R = BufReader<File>> {
    reader: R,
    line_number: usize,
    line: String,
}

impl ReplaySource {
    /// Open a replay file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Replaying detections from {}", path.display());
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    /// Replay from any buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            line: String::new(),
        }
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<Detections>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let text = self.line.trim();
        if text.is_empty() {
            return Ok(Some(Vec::new()));
        }
        serde_json::from_str(text)
            .map(Some)
            .map_err(|e| Error::CaptureError(format!("Replay line {}: {e}", self.line_number)))
    }

    fn name(&self) -> &str {
        "ReplaySource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_frames() {
        let data = "[{\"id\": 3, \"corners\": [[0,0],[2,0],[2,2],[0,2]]}]\n\n[]\n";
        let mut source = ReplaySource::from_reader(data.as_bytes());

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, 3);
        assert!(source.next_frame().unwrap().unwrap().is_empty());
        assert!(source.next_frame().unwrap().unwrap().is_empty());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_malformed_line_is_capture_error() {
        let mut source = ReplaySource::from_reader("[{\"id\": 3}]\n".as_bytes());
        assert!(matches!(source.next_frame(), Err(Error::CaptureError(msg)) if msg.contains("line 1")));
    }
}
