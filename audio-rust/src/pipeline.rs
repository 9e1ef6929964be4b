use crate::{
    base64_codec::decode_base64,
    mime_utils::WAV_MIME_TYPE,
    pcm::decode_pcm16_with,
    wav::{decode_wav, encode_wav},
    AudioError, AudioFormat, AudioPayload, AudioResult, DecodeOptions, DecodedAudio, PcmFormat,
};

/// Decoded samples for playback together with the same audio as a WAV file
/// for download.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    pub audio: DecodedAudio,
    pub wav: Vec<u8>,
}

impl RenderedAudio {
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }
}

/// Turns base64 PCM16 from the speech service into playable samples and a
/// WAV file.
///
/// # Errors
/// - [`AudioError::EmptyPayload`] if `base64_audio` is empty.
/// - Any error of [`decode_base64`], [`decode_pcm16_with`] or [`encode_wav`].
pub fn render_audio(base64_audio: &str, format: &PcmFormat) -> AudioResult<RenderedAudio> {
    if base64_audio.is_empty() {
        return Err(AudioError::EmptyPayload);
    }
    let bytes = decode_base64(base64_audio)?;
    let audio = decode_pcm16_with(&bytes, format, &DecodeOptions::default())?;
    let wav = encode_wav(&audio)?;
    Ok(RenderedAudio { audio, wav })
}

/// Decodes a payload handed over by the speech service.
///
/// # Errors
/// - [`AudioError::EmptyPayload`] if the payload carries no data.
/// - [`AudioError::Unsupported`] if the payload is neither linear16 nor WAV.
/// - Any decoding error of the base64 text or the audio inside it.
pub fn decode_payload(payload: &AudioPayload) -> AudioResult<DecodedAudio> {
    if payload.audio_data.is_empty() {
        return Err(AudioError::EmptyPayload);
    }
    match payload.format {
        AudioFormat::Linear16 => {
            let bytes = decode_base64(&payload.audio_data)?;
            decode_pcm16_with(&bytes, &payload.pcm_format(), &DecodeOptions::default())
        }
        AudioFormat::Wav => decode_wav(&decode_base64(&payload.audio_data)?),
        other => Err(AudioError::Unsupported(format!(
            "Only linear16 and wav payloads can be decoded. Received: {other:?}"
        ))),
    }
}
