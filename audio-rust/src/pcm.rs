use crate::{
    opentelemetry::trace_codec, AudioError, AudioResult, DecodeOptions, DecodedAudio, PcmFormat,
    TrailingFramePolicy,
};

/// Divisor mapping a signed 16-bit sample onto `[-1.0, 1.0)`.
///
/// `-32768` maps to exactly `-1.0` and `32767` to `0.999_969_5`.
pub const PCM16_SCALE: f32 = 32768.0;

const BYTES_PER_SAMPLE: usize = 2;

#[must_use]
pub fn sample_from_i16(value: i16) -> f32 {
    f32::from(value) / PCM16_SCALE
}

/// Converts a normalized sample back to 16 bits: scale by 32768, round to
/// nearest (ties away from zero) and clamp, so `1.0` becomes `32767`.
/// `NaN` becomes silence.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sample_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample * PCM16_SCALE)
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Decodes interleaved little-endian PCM16 bytes, rejecting an incomplete
/// trailing frame.
///
/// # Errors
/// - [`AudioError::InvalidAudioState`] if `sample_rate` or `channels` is zero.
/// - [`AudioError::TruncatedAudio`] if `bytes` has an odd length or does not
///   end on a frame boundary.
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> AudioResult<DecodedAudio> {
    decode_pcm16_with(
        bytes,
        &PcmFormat::new(sample_rate, channels),
        &DecodeOptions::default(),
    )
}

/// Decodes interleaved little-endian PCM16 bytes with an explicit policy
/// for an incomplete trailing frame.
///
/// # Errors
/// - [`AudioError::InvalidAudioState`] if the format has a zero sample rate or
///   channel count.
/// - [`AudioError::TruncatedAudio`] if `bytes` has an odd length, or if it does
///   not end on a frame boundary and the policy is
///   [`TrailingFramePolicy::Reject`].
pub fn decode_pcm16_with(
    bytes: &[u8],
    format: &PcmFormat,
    options: &DecodeOptions,
) -> AudioResult<DecodedAudio> {
    trace_codec("decode_pcm16", bytes.len(), |span| {
        span.on_format(*format);
        format.validate()?;

        if bytes.len() % BYTES_PER_SAMPLE != 0 {
            return Err(AudioError::TruncatedAudio(format!(
                "{} bytes is not a whole number of 16-bit samples",
                bytes.len()
            )));
        }

        let block_align = format.block_align();
        let remainder = bytes.len() % block_align;
        if remainder != 0 {
            match options.trailing_frame {
                TrailingFramePolicy::Reject => {
                    return Err(AudioError::TruncatedAudio(format!(
                        "{} bytes leaves {} of a {block_align}-byte frame",
                        bytes.len(),
                        remainder
                    )));
                }
                TrailingFramePolicy::Drop => {
                    tracing::warn!(
                        dropped_bytes = remainder,
                        channels = format.channels,
                        "dropping incomplete trailing frame"
                    );
                }
            }
        }

        let usable = &bytes[..bytes.len() - remainder];
        let frame_count = usable.len() / block_align;
        let mut channels: Vec<Vec<f32>> = (0..format.channels)
            .map(|_| Vec::with_capacity(frame_count))
            .collect();

        for frame in usable.chunks_exact(block_align) {
            let samples = frame.chunks_exact(BYTES_PER_SAMPLE);
            for (channel, sample) in channels.iter_mut().zip(samples) {
                channel.push(sample_from_i16(i16::from_le_bytes([sample[0], sample[1]])));
            }
        }

        tracing::debug!(
            frames = frame_count,
            channels = format.channels,
            sample_rate = format.sample_rate,
            "decoded pcm16"
        );

        DecodedAudio::new(format.sample_rate, channels)
    })
}

/// Interleaves and quantizes decoded audio back into little-endian PCM16.
#[must_use]
pub fn encode_pcm16(audio: &DecodedAudio) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pcm16_len(audio));
    write_pcm16(audio, &mut bytes);
    bytes
}

pub(crate) fn pcm16_len(audio: &DecodedAudio) -> usize {
    audio.frame_count() * usize::from(audio.channel_count()) * BYTES_PER_SAMPLE
}

pub(crate) fn write_pcm16(audio: &DecodedAudio, out: &mut Vec<u8>) {
    for sample in audio.interleaved() {
        out.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }
}
