use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The base64 payload contains characters outside the standard alphabet
    /// or has an invalid length/padding.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),
    /// The PCM byte stream does not end on a sample or frame boundary.
    #[error("Truncated audio: {0}")]
    TruncatedAudio(String),
    /// A `DecodedAudio` (or the metadata used to build one) breaks its own
    /// invariants: no channels, ragged channels, or a zero sample rate.
    #[error("Invalid audio state: {0}")]
    InvalidAudioState(String),
    /// A WAV container could not be read back.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),
    /// The input is not 16-bit linear PCM.
    #[error("Unsupported: {0}")]
    Unsupported(String),
    /// The synthesis collaborator returned no audio data at all.
    #[error("Payload contains no audio data")]
    EmptyPayload,
    /// The playback collaborator failed.
    #[error("Audio output error: {0}")]
    Output(String),
}

pub type AudioResult<T> = Result<T, AudioError>;
