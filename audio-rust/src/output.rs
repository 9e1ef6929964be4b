use crate::{AudioResult, DecodedAudio};

/// Anything that can play decoded samples: an audio device, a test double.
///
/// Implementations only read the samples; the sample rate and channel count
/// of `audio` are authoritative and must not be inferred from buffer sizes.
pub trait AudioOutput {
    /// Plays (or queues) `audio`.
    ///
    /// # Errors
    /// Returns [`AudioError::Output`](crate::AudioError::Output) when the
    /// device rejects the audio.
    fn play(&mut self, audio: &DecodedAudio) -> AudioResult<()>;
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn play(&mut self, audio: &DecodedAudio) -> AudioResult<()> {
        (**self).play(audio)
    }
}
