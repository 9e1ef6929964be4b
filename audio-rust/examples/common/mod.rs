use tracing_subscriber::EnvFilter;
use tts_audio::{map_mime_type_to_pcm_format, PcmFormat};

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tts_audio=debug")),
        )
        .init();
}

/// Reads a file holding base64 audio as returned by the speech service.
/// Line breaks and surrounding whitespace are stripped.
pub fn read_base64(path: &str) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
        .split_whitespace()
        .collect()
}

/// Format from an optional MIME type argument, e.g.
/// `audio/L16;codec=pcm;rate=24000`.
pub fn pcm_format(mime_type: Option<&str>) -> PcmFormat {
    mime_type.map_or_else(PcmFormat::default, |mime_type| {
        map_mime_type_to_pcm_format(mime_type).expect("unsupported mime type")
    })
}
