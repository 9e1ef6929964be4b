//! Codec core for speech-synthesis audio: base64 text to raw bytes, raw
//! PCM16 to normalized per-channel samples, and samples to a canonical WAV
//! file.
//!
//! ```
//! use tts_audio::{decode_base64, decode_pcm16, encode_wav};
//!
//! let bytes = decode_base64("AAD/fw==")?;
//! let audio = decode_pcm16(&bytes, 24_000, 1)?;
//! let wav = encode_wav(&audio)?;
//! assert_eq!(&wav[44..], &[0x00, 0x00, 0xFF, 0x7F]);
//! # Ok::<(), tts_audio::AudioError>(())
//! ```

mod base64_codec;
mod errors;
mod mime_utils;
mod opentelemetry;
mod output;
mod pcm;
mod pipeline;
mod types;
mod wav;

pub mod audio_test;

pub use base64_codec::{decode_base64, encode_base64};
pub use errors::*;
pub use mime_utils::*;
pub use output::AudioOutput;
pub use pcm::{
    decode_pcm16, decode_pcm16_with, encode_pcm16, sample_from_i16, sample_to_i16, PCM16_SCALE,
};
pub use pipeline::{decode_payload, render_audio, RenderedAudio};
pub use types::*;
pub use wav::{decode_wav, encode_wav, WavHeader, WAV_HEADER_LEN};
