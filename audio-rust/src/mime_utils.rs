use crate::{AudioError, AudioFormat, AudioResult, PcmFormat};

pub const WAV_MIME_TYPE: &str = "audio/wav";

#[must_use]
pub fn map_audio_format_to_mime_type(format: AudioFormat) -> &'static str {
    match format {
        AudioFormat::Linear16 => "audio/l16",
        AudioFormat::Wav => WAV_MIME_TYPE,
        AudioFormat::Mp3 => "audio/mpeg",
        AudioFormat::Flac => "audio/flac",
        AudioFormat::Opus => "audio/opus",
        AudioFormat::Aac => "audio/aac",
        AudioFormat::Mulaw | AudioFormat::Alaw => "audio/basic",
    }
}

/// Maps a MIME type (parameters ignored) to the audio format it labels.
///
/// # Errors
/// Returns [`AudioError::Unsupported`] for types that are not audio formats
/// known to the speech service.
pub fn map_mime_type_to_audio_format(mime_type: &str) -> AudioResult<AudioFormat> {
    let (essence, _) = split_mime_type(mime_type);
    Ok(match essence.as_str() {
        "audio/l16" | "audio/pcm" => AudioFormat::Linear16,
        "audio/wav" | "audio/x-wav" | "audio/wave" => AudioFormat::Wav,
        "audio/mp3" | "audio/mpeg" => AudioFormat::Mp3,
        "audio/flac" => AudioFormat::Flac,
        "audio/opus" | "audio/ogg" => AudioFormat::Opus,
        "audio/aac" => AudioFormat::Aac,
        "audio/basic" => AudioFormat::Mulaw,
        _ => Err(AudioError::Unsupported(format!(
            "Unsupported audio mime type: {mime_type}"
        )))?,
    })
}

/// Reads the PCM format out of a linear16 MIME type such as
/// `audio/L16;codec=pcm;rate=24000`. Missing `rate` and `channels`
/// parameters fall back to [`PcmFormat::default`].
///
/// # Errors
/// Returns [`AudioError::Unsupported`] if the type is not linear16 or a
/// parameter cannot be parsed.
pub fn map_mime_type_to_pcm_format(mime_type: &str) -> AudioResult<PcmFormat> {
    if map_mime_type_to_audio_format(mime_type)? != AudioFormat::Linear16 {
        return Err(AudioError::Unsupported(format!(
            "Expected a linear16 mime type, received: {mime_type}"
        )));
    }

    let (_, params) = split_mime_type(mime_type);
    let mut format = PcmFormat::default();
    for (key, value) in params {
        match key.as_str() {
            "rate" => {
                format.sample_rate = value.parse().map_err(|_| {
                    AudioError::Unsupported(format!("Invalid rate in mime type: {mime_type}"))
                })?;
            }
            "channels" => {
                format.channels = value.parse().map_err(|_| {
                    AudioError::Unsupported(format!("Invalid channels in mime type: {mime_type}"))
                })?;
            }
            "codec" if !value.eq_ignore_ascii_case("pcm") => {
                return Err(AudioError::Unsupported(format!(
                    "Unsupported codec in mime type: {mime_type}"
                )));
            }
            _ => {}
        }
    }
    Ok(format)
}

#[must_use]
pub fn map_pcm_format_to_mime_type(format: &PcmFormat) -> String {
    let mut mime_type = format!("audio/L16;codec=pcm;rate={}", format.sample_rate);
    if format.channels != 1 {
        mime_type.push_str(&format!(";channels={}", format.channels));
    }
    mime_type
}

fn split_mime_type(mime_type: &str) -> (String, Vec<(String, String)>) {
    let mut parts = mime_type.split(';');
    let essence = parts.next().unwrap_or(mime_type).trim().to_lowercase();
    let params = parts
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            Some((
                key.trim().to_lowercase(),
                value.trim().trim_matches('"').to_string(),
            ))
        })
        .collect();
    (essence, params)
}
