// Usage: cargo run --example pcm-to-wav -- <audio.b64> <out.wav> [mime-type]
use tts_audio::render_audio;

mod common;

fn main() {
    common::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, output) = match args.as_slice() {
        [input, output, ..] => (input, output),
        _ => panic!("usage: pcm-to-wav <audio.b64> <out.wav> [mime-type]"),
    };
    let format = common::pcm_format(args.get(2).map(String::as_str));

    let rendered =
        render_audio(&common::read_base64(input), &format).expect("failed to render audio");

    std::fs::write(output, &rendered.wav).expect("failed to write wav file");
    println!(
        "Wrote {output} ({} bytes, {:.2}s, {} Hz, {} channel(s), {})",
        rendered.wav.len(),
        rendered.audio.duration().as_secs_f64(),
        rendered.audio.sample_rate(),
        rendered.audio.channel_count(),
        rendered.mime_type(),
    );
}
