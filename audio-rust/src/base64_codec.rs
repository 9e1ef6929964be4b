use crate::{opentelemetry::trace_codec, AudioResult};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};

/// Decodes a standard-alphabet, padded base64 string into raw bytes.
///
/// # Errors
/// Returns [`AudioError::MalformedEncoding`](crate::AudioError::MalformedEncoding)
/// when the text has characters outside the alphabet, a length that is not a
/// multiple of 4, or misplaced padding.
pub fn decode_base64(text: &str) -> AudioResult<Vec<u8>> {
    trace_codec("decode_base64", text.len(), |_| {
        let bytes = BASE64_STANDARD.decode(text).inspect_err(|e| {
            tracing::debug!(error = %e, input_len = text.len(), "rejected base64 payload");
        })?;
        Ok(bytes)
    })
}

#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}
