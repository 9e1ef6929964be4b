// Usage: cargo run --example play-audio -- <audio.b64> [mime-type]
use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink};
use tts_audio::{render_audio, AudioError, AudioOutput, AudioResult, DecodedAudio};

mod common;

struct RodioOutput {
    // Dropping the stream stops playback.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

impl RodioOutput {
    fn try_default() -> AudioResult<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Output(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| AudioError::Output(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
        })
    }

    fn sleep_until_end(&self) {
        self.sink.sleep_until_end();
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, audio: &DecodedAudio) -> AudioResult<()> {
        let samples: Vec<f32> = audio.interleaved().collect();
        self.sink.append(SamplesBuffer::new(
            audio.channel_count(),
            audio.sample_rate(),
            samples,
        ));
        Ok(())
    }
}

fn main() {
    common::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = args
        .first()
        .expect("usage: play-audio <audio.b64> [mime-type]");
    let format = common::pcm_format(args.get(1).map(String::as_str));

    let rendered =
        render_audio(&common::read_base64(input), &format).expect("failed to render audio");
    println!(
        "Playing {:.2}s of audio at {} Hz",
        rendered.audio.duration().as_secs_f64(),
        rendered.audio.sample_rate()
    );

    let mut output = RodioOutput::try_default().expect("no default audio output device");
    output.play(&rendered.audio).expect("playback failed");
    output.sleep_until_end();
    println!("Playback finished");
}
