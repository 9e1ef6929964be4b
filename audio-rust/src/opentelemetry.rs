use crate::{AudioResult, DecodedAudio, PcmFormat};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Span around a single codec call. Attributes are flushed once, when the
/// call ends or the span is dropped.
pub struct CodecSpan {
    span: Span,
    start_time: Instant,
    input_bytes: usize,
    output_bytes: Option<usize>,
    format: Option<PcmFormat>,
    frames: Option<usize>,
    ended: bool,
}

impl CodecSpan {
    #[must_use]
    pub fn new(operation: &'static str, input_bytes: usize) -> Self {
        let span = info_span!("tts_audio.codec", operation);
        span.set_attribute("audio.codec.operation", operation);

        Self {
            span,
            start_time: Instant::now(),
            input_bytes,
            output_bytes: None,
            format: None,
            frames: None,
            ended: false,
        }
    }

    pub fn on_format(&mut self, format: PcmFormat) {
        self.format = Some(format);
    }

    pub fn on_audio(&mut self, audio: &DecodedAudio) {
        self.format = Some(audio.format());
        self.frames = Some(audio.frame_count());
    }

    pub fn on_output_bytes(&mut self, len: usize) {
        self.output_bytes = Some(len);
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        self.span
            .set_attribute("audio.input_bytes", to_i64(self.input_bytes));
        if let Some(output_bytes) = self.output_bytes {
            self.span
                .set_attribute("audio.output_bytes", to_i64(output_bytes));
        }
        if let Some(format) = self.format {
            self.span
                .set_attribute("audio.sample_rate", i64::from(format.sample_rate));
            self.span
                .set_attribute("audio.channels", i64::from(format.channels));
        }
        if let Some(frames) = self.frames {
            self.span.set_attribute("audio.frames", to_i64(frames));
        }
        self.span.set_attribute(
            "audio.codec.elapsed_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for CodecSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Output of a codec call that knows how to describe itself on a span.
pub trait CodecOutput {
    fn record(&self, span: &mut CodecSpan);
}

impl CodecOutput for DecodedAudio {
    fn record(&self, span: &mut CodecSpan) {
        span.on_audio(self);
    }
}

impl CodecOutput for Vec<u8> {
    fn record(&self, span: &mut CodecSpan) {
        span.on_output_bytes(self.len());
    }
}

/// Runs `f` inside a [`CodecSpan`], recording its output or its error.
pub fn trace_codec<T, F>(operation: &'static str, input_bytes: usize, f: F) -> AudioResult<T>
where
    T: CodecOutput,
    F: FnOnce(&mut CodecSpan) -> AudioResult<T>,
{
    let mut span = CodecSpan::new(operation, input_bytes);
    let span_handle = span.span.clone();
    let result = span_handle.in_scope(|| f(&mut span));

    match &result {
        Ok(output) => output.record(&mut span),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}
