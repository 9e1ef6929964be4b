use std::collections::VecDeque;

use crate::{AudioError, AudioOutput, AudioResult, DecodedAudio};

/// An [`AudioOutput`] for tests that records what it was asked to play and
/// yields queued errors.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    played: Vec<DecodedAudio>,
    mocked_errors: VecDeque<AudioError>,
}

impl RecordingOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `play` call fail with `error` instead of recording.
    pub fn enqueue_error(&mut self, error: AudioError) -> &mut Self {
        self.mocked_errors.push_back(error);
        self
    }

    #[must_use]
    pub fn played(&self) -> &[DecodedAudio] {
        &self.played
    }

    /// Clears recorded audio and queued errors.
    pub fn restore(&mut self) {
        self.played.clear();
        self.mocked_errors.clear();
    }
}

impl AudioOutput for RecordingOutput {
    fn play(&mut self, audio: &DecodedAudio) -> AudioResult<()> {
        if let Some(error) = self.mocked_errors.pop_front() {
            return Err(error);
        }
        self.played.push(audio.clone());
        Ok(())
    }
}
