//! Canonical RIFF/WAVE container for 16-bit PCM.
//!
//! The writer always emits the 44-byte layout: `RIFF` descriptor, a 16-byte
//! `fmt ` chunk and a `data` chunk, with no extension or metadata chunks.
//! The reader accepts the same layout and skips unknown chunks that precede
//! `data`. All integers are little-endian.

use crate::{
    opentelemetry::trace_codec,
    pcm::{decode_pcm16_with, pcm16_len, write_pcm16},
    AudioError, AudioResult, DecodeOptions, DecodedAudio, PcmFormat,
};

pub const WAV_HEADER_LEN: usize = 44;

const PCM_FORMAT_TAG: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const FMT_CHUNK_LEN: u32 = 16;
/// Bytes counted by the RIFF chunk size besides the sample data.
const RIFF_OVERHEAD: u32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Length of the `data` chunk payload in bytes.
    pub data_size: u32,
}

impl WavHeader {
    /// Header for `data_size` bytes of 16-bit PCM in `format`.
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidAudioState`] if the format is empty or the
    /// derived sizes do not fit the 32-bit RIFF fields.
    pub fn pcm16(format: PcmFormat, data_size: u32) -> AudioResult<Self> {
        format.validate()?;
        let too_large = || {
            AudioError::InvalidAudioState(format!(
                "{} Hz x {} channels exceeds WAV field limits",
                format.sample_rate, format.channels
            ))
        };
        let block_align = format.channels.checked_mul(2).ok_or_else(too_large)?;
        let byte_rate = format
            .sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or_else(too_large)?;
        if data_size > u32::MAX - RIFF_OVERHEAD {
            return Err(AudioError::InvalidAudioState(format!(
                "{data_size} bytes of samples exceeds the 4 GiB RIFF limit"
            )));
        }

        Ok(Self {
            channels: format.channels,
            sample_rate: format.sample_rate,
            byte_rate,
            block_align,
            bits_per_sample: BITS_PER_SAMPLE,
            data_size,
        })
    }

    /// Value of the RIFF `ChunkSize` field.
    #[must_use]
    pub fn chunk_size(&self) -> u32 {
        RIFF_OVERHEAD + self.data_size
    }

    #[must_use]
    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels)
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&self.chunk_size().to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.byte_rate.to_le_bytes());
        out.extend_from_slice(&self.block_align.to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&self.data_size.to_le_bytes());
    }

    /// Parses a PCM16 WAV container, returning its header and the `data`
    /// chunk payload.
    ///
    /// # Errors
    /// - [`AudioError::InvalidContainer`] if the RIFF/WAVE structure is broken
    ///   or the `data` chunk is missing or truncated.
    /// - [`AudioError::Unsupported`] if the audio is not 16-bit integer PCM.
    pub fn parse(bytes: &[u8]) -> AudioResult<(Self, &[u8])> {
        if bytes.get(0..4) != Some(b"RIFF".as_slice())
            || bytes.get(8..12) != Some(b"WAVE".as_slice())
        {
            return Err(AudioError::InvalidContainer(
                "missing RIFF/WAVE signature".to_string(),
            ));
        }

        let mut format: Option<(u16, u32)> = None;
        let mut offset = 12;
        loop {
            let id = bytes.get(offset..offset + 4).ok_or_else(|| {
                AudioError::InvalidContainer("no data chunk found".to_string())
            })?;
            let size = read_u32(bytes, offset + 4)?;
            let body_start = offset + 8;

            match id {
                b"fmt " => {
                    if size < FMT_CHUNK_LEN {
                        return Err(AudioError::InvalidContainer(format!(
                            "fmt chunk is {size} bytes, expected at least {FMT_CHUNK_LEN}"
                        )));
                    }
                    let format_tag = read_u16(bytes, body_start)?;
                    let bits = read_u16(bytes, body_start + 14)?;
                    if format_tag != PCM_FORMAT_TAG || bits != BITS_PER_SAMPLE {
                        return Err(AudioError::Unsupported(format!(
                            "WAV format tag {format_tag} with {bits} bits per sample"
                        )));
                    }
                    format = Some((
                        read_u16(bytes, body_start + 2)?,
                        read_u32(bytes, body_start + 4)?,
                    ));
                }
                b"data" => {
                    let (channels, sample_rate) = format.ok_or_else(|| {
                        AudioError::InvalidContainer("data chunk before fmt chunk".to_string())
                    })?;
                    let data = usize::try_from(size)
                        .ok()
                        .and_then(|len| bytes.get(body_start..body_start.checked_add(len)?))
                        .ok_or_else(|| {
                            AudioError::InvalidContainer(format!(
                                "data chunk declares {size} bytes, {} available",
                                bytes.len().saturating_sub(body_start)
                            ))
                        })?;
                    let header = Self::pcm16(PcmFormat::new(sample_rate, channels), size)
                        .map_err(|e| AudioError::InvalidContainer(e.to_string()))?;
                    return Ok((header, data));
                }
                other => {
                    tracing::debug!(
                        chunk = %String::from_utf8_lossy(other),
                        size,
                        "skipping wav chunk"
                    );
                }
            }

            // Chunks are padded to an even length.
            let padded = usize::try_from(size)
                .ok()
                .and_then(|len| len.checked_add(len % 2))
                .and_then(|len| body_start.checked_add(len))
                .ok_or_else(|| AudioError::InvalidContainer("chunk size overflow".to_string()))?;
            offset = padded;
        }
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> AudioResult<u16> {
    bytes
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| AudioError::InvalidContainer(format!("truncated header at byte {offset}")))
}

fn read_u32(bytes: &[u8], offset: usize) -> AudioResult<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| AudioError::InvalidContainer(format!("truncated header at byte {offset}")))
}

/// Serializes decoded audio into a complete 16-bit PCM WAV file.
///
/// # Errors
/// Returns [`AudioError::InvalidAudioState`] if the audio breaks its
/// invariants or is too long for a RIFF container.
pub fn encode_wav(audio: &DecodedAudio) -> AudioResult<Vec<u8>> {
    let input_bytes =
        audio.frame_count() * usize::from(audio.channel_count()) * std::mem::size_of::<f32>();
    trace_codec("encode_wav", input_bytes, |span| {
        span.on_audio(audio);
        audio.check_invariants()?;

        let data_len = pcm16_len(audio);
        let data_size = u32::try_from(data_len).map_err(|_| {
            AudioError::InvalidAudioState(format!(
                "{data_len} bytes of samples exceeds the 4 GiB RIFF limit"
            ))
        })?;
        let header = WavHeader::pcm16(audio.format(), data_size)?;

        let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len);
        header.write_to(&mut out);
        write_pcm16(audio, &mut out);

        tracing::debug!(bytes = out.len(), frames = audio.frame_count(), "encoded wav");
        Ok(out)
    })
}

/// Reads a 16-bit PCM WAV file back into decoded audio.
///
/// # Errors
/// Fails like [`WavHeader::parse`], and with [`AudioError::TruncatedAudio`]
/// if the data chunk does not end on a frame boundary.
pub fn decode_wav(bytes: &[u8]) -> AudioResult<DecodedAudio> {
    let (header, data) = WavHeader::parse(bytes)?;
    decode_pcm16_with(data, &header.format(), &DecodeOptions::default())
}
