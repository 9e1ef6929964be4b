use crate::{AudioError, AudioResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sample rate of the speech service's raw PCM output.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
/// The speech service emits mono audio.
pub const DEFAULT_CHANNELS: u16 = 1;

/// Loosely describes how a payload's bytes are encoded. Only `Linear16` and
/// `Wav` can be decoded; the rest exist so that other labels coming from the
/// service can be recognized and rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Linear16,
    Wav,
    Mp3,
    Flac,
    Opus,
    Aac,
    Mulaw,
    Alaw,
}

/// Out-of-band description of a raw PCM16 stream. The stream itself carries
/// no header, so both values are agreed upon with the producer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct PcmFormat {
    /// Samples per second per channel. E.g. 24000, 44100.
    #[serde(alias = "sampleRate")]
    pub sample_rate: u32,
    /// Number of interleaved channels. E.g. 1, 2.
    pub channels: u16,
}

impl PcmFormat {
    #[must_use]
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Bytes per frame (one 16-bit sample per channel).
    #[must_use]
    pub fn block_align(&self) -> usize {
        usize::from(self.channels) * 2
    }

    pub(crate) fn validate(&self) -> AudioResult<()> {
        if self.sample_rate == 0 {
            return Err(AudioError::InvalidAudioState(
                "sample_rate must be positive".to_string(),
            ));
        }
        if self.channels == 0 {
            return Err(AudioError::InvalidAudioState(
                "channels must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS)
    }
}

/// What to do with a trailing frame that is missing samples for some
/// channels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TrailingFramePolicy {
    /// Fail with [`AudioError::TruncatedAudio`].
    #[default]
    Reject,
    /// Discard the incomplete frame and decode the rest.
    Drop,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(default)]
pub struct DecodeOptions {
    pub trailing_frame: TrailingFramePolicy,
}

/// Audio handed over by the speech-synthesis collaborator. Serialized in
/// snake_case; the camelCase field names the service uses are accepted too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct AudioPayload {
    /// The base64-encoded audio data.
    #[serde(alias = "audioData")]
    pub audio_data: String,
    /// The format of the audio.
    pub format: AudioFormat,
    /// The sample rate of the audio. Defaults to 24000 for linear16.
    #[serde(alias = "sampleRate", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// The number of channels of the audio. Defaults to 1 for linear16.
    #[serde(alias = "channelCount", skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
}

impl AudioPayload {
    /// A linear16 payload at the given format.
    #[must_use]
    pub fn linear16(audio_data: impl Into<String>, format: PcmFormat) -> Self {
        Self {
            audio_data: audio_data.into(),
            format: AudioFormat::Linear16,
            sample_rate: Some(format.sample_rate),
            channels: Some(format.channels),
        }
    }

    /// The PCM format declared by the payload, with defaults for missing
    /// fields.
    #[must_use]
    pub fn pcm_format(&self) -> PcmFormat {
        let default = PcmFormat::default();
        PcmFormat {
            sample_rate: self.sample_rate.unwrap_or(default.sample_rate),
            channels: self.channels.unwrap_or(default.channels),
        }
    }
}

/// Normalized, de-interleaved audio.
///
/// Every channel holds the same number of frames and every sample is a
/// 16-bit value divided by 32768, so it lies in `[-1.0, 1.0)`. A value is
/// validated once on construction and cannot be mutated afterwards; consumers
/// only ever get shared references to the sample data.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Builds decoded audio from per-channel sample sequences.
    ///
    /// Sample values are not range-checked. Anything outside `[-1.0, 1.0]`
    /// is clamped to full scale when encoded, and `NaN` is encoded as
    /// silence (see [`sample_to_i16`](crate::sample_to_i16)).
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidAudioState`] if `sample_rate` is zero,
    /// `channels` is empty or longer than `u16::MAX`, or the channels differ
    /// in length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> AudioResult<Self> {
        if channels.is_empty() {
            return Err(AudioError::InvalidAudioState(
                "audio must have at least one channel".to_string(),
            ));
        }
        if u16::try_from(channels.len()).is_err() {
            return Err(AudioError::InvalidAudioState(format!(
                "too many channels: {}",
                channels.len()
            )));
        }
        PcmFormat::new(sample_rate, 1).validate()?;

        let frame_count = channels[0].len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, channel)| channel.len() != frame_count)
        {
            return Err(AudioError::InvalidAudioState(format!(
                "channel {index} has {} frames, expected {frame_count}",
                channel.len()
            )));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn channel_count(&self) -> u16 {
        // Bounded by `new`.
        self.channels.len() as u16
    }

    #[must_use]
    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channel_count())
    }

    /// Number of frames, i.e. samples per channel.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    #[must_use]
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Playback length at the stated sample rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / f64::from(self.sample_rate))
    }

    /// Samples in interleaved order: frame by frame, channel by channel.
    pub fn interleaved(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.frame_count()).flat_map(move |frame| {
            self.channels.iter().map(move |channel| channel[frame])
        })
    }

    /// Re-checks the invariants established by [`DecodedAudio::new`].
    pub(crate) fn check_invariants(&self) -> AudioResult<()> {
        let frame_count = self.frame_count();
        if self.channels.is_empty()
            || self.sample_rate == 0
            || self.channels.iter().any(|c| c.len() != frame_count)
        {
            return Err(AudioError::InvalidAudioState(format!(
                "inconsistent audio: {} channels at {} Hz",
                self.channels.len(),
                self.sample_rate
            )));
        }
        Ok(())
    }
}
