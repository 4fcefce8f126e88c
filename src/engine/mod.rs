//! Incremental extraction and rendering of one streamed model turn.

pub mod diff;
pub mod extract;
pub mod render;
pub mod status;

use crate::project::ProjectFiles;
use extract::{BlockScanner, FileBlock};
use status::StreamStatus;

/// Literal tag the model ends a plan with when it wants a yes/no.
pub const CONFIRMATION_TAG: &str = "[awaiting_confirmation]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub html: String,
    pub new_blocks: Vec<FileBlock>,
    pub status: Option<StreamStatus>,
    pub awaiting_confirmation: bool,
}

#[derive(Debug, Default)]
pub struct TurnEngine {
    buffer: String,
    scanner: BlockScanner,
}

impl TurnEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.buffer.contains(CONFIRMATION_TAG)
    }

    /// Empty fragments are no-ops.
    pub fn push(&mut self, fragment: &str, files: &mut ProjectFiles) -> Option<ScanOutcome> {
        if fragment.is_empty() {
            return None;
        }
        self.buffer.push_str(fragment);
        let status = status::classify(fragment);
        let new_blocks = self.scanner.scan(&self.buffer, files);
        Some(ScanOutcome {
            html: render::render_response(&self.buffer, self.scanner.blocks()),
            new_blocks,
            status,
            awaiting_confirmation: self.awaiting_confirmation(),
        })
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
