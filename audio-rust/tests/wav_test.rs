use std::io::Cursor;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tts_audio::{
    decode_pcm16, decode_wav, encode_pcm16, encode_wav, AudioError, DecodedAudio, PcmFormat,
    WavHeader, WAV_HEADER_LEN,
};

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn chunk(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&u32::try_from(body.len()).unwrap().to_le_bytes());
    out.extend_from_slice(body);
    if body.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&u32::try_from(body.len() + 4).unwrap().to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(&body);
    out
}

fn fmt_body(format_tag: u16, channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut out = Vec::new();
    out.extend_from_slice(&format_tag.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out
}

#[test]
fn encode_wav_writes_canonical_mono_file() {
    let audio = decode_pcm16(&[0x00, 0x00, 0xFF, 0x7F], 24_000, 1).unwrap();
    let wav = encode_wav(&audio).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(b"RIFF");
    expected.extend_from_slice(&40u32.to_le_bytes());
    expected.extend_from_slice(b"WAVE");
    expected.extend_from_slice(b"fmt ");
    expected.extend_from_slice(&16u32.to_le_bytes());
    expected.extend_from_slice(&1u16.to_le_bytes());
    expected.extend_from_slice(&1u16.to_le_bytes());
    expected.extend_from_slice(&24_000u32.to_le_bytes());
    expected.extend_from_slice(&48_000u32.to_le_bytes());
    expected.extend_from_slice(&2u16.to_le_bytes());
    expected.extend_from_slice(&16u16.to_le_bytes());
    expected.extend_from_slice(b"data");
    expected.extend_from_slice(&4u32.to_le_bytes());
    expected.extend_from_slice(&[0x00, 0x00, 0xFF, 0x7F]);

    assert_eq!(wav, expected);
}

#[test]
fn encode_wav_empty_audio_is_bare_header() {
    let audio = DecodedAudio::new(24_000, vec![Vec::new()]).unwrap();
    let wav = encode_wav(&audio).unwrap();

    assert_eq!(wav.len(), WAV_HEADER_LEN);
    assert_eq!(u32_at(&wav, 4), 36);
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(u32_at(&wav, 40), 0);
}

#[test]
fn encode_wav_stereo_header_fields() {
    let audio = DecodedAudio::new(44_100, vec![vec![0.0; 10], vec![0.5; 10]]).unwrap();
    let wav = encode_wav(&audio).unwrap();
    let data_size = 10 * 2 * 2;

    assert_eq!(wav.len(), WAV_HEADER_LEN + data_size);
    assert_eq!(u32_at(&wav, 4), 36 + u32::try_from(data_size).unwrap());
    assert_eq!(u16_at(&wav, 22), 2);
    assert_eq!(u32_at(&wav, 24), 44_100);
    assert_eq!(u32_at(&wav, 28), 44_100 * 4);
    assert_eq!(u16_at(&wav, 32), 4);
    assert_eq!(u16_at(&wav, 34), 16);
    assert_eq!(u32_at(&wav, 40), u32::try_from(data_size).unwrap());
}

#[test]
fn encode_wav_clamps_full_scale_samples() {
    let audio = DecodedAudio::new(8_000, vec![vec![1.0, -1.0, 1.5, -2.0]]).unwrap();
    let wav = encode_wav(&audio).unwrap();
    let samples: Vec<i16> = wav[WAV_HEADER_LEN..]
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(samples, vec![i16::MAX, i16::MIN, i16::MAX, i16::MIN]);
}

#[test]
fn encode_wav_is_readable_by_hound() {
    let audio = DecodedAudio::new(
        22_050,
        vec![vec![0.0, 0.25, -0.5], vec![-1.0, 0.999_969_5, 0.125]],
    )
    .unwrap();
    let wav = encode_wav(&audio).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 22_050);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration(), 3);

    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples, vec![0, -32768, 8192, 32767, -16384, 4096]);
}

#[test]
fn encode_wav_is_deterministic_and_does_not_touch_input() {
    let audio = DecodedAudio::new(24_000, vec![vec![0.1, -0.2, 0.3]]).unwrap();
    let snapshot = audio.clone();
    assert_eq!(encode_wav(&audio).unwrap(), encode_wav(&audio).unwrap());
    assert_eq!(audio, snapshot);
}

#[test]
fn encode_wav_round_trips_within_one_quantization_step() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for channels in 1..=3u16 {
        let frames = rng.gen_range(0..512);
        let samples: Vec<Vec<f32>> = (0..channels)
            .map(|_| (0..frames).map(|_| rng.gen_range(-1.0f32..1.0)).collect())
            .collect();
        let audio = DecodedAudio::new(24_000, samples).unwrap();

        let wav = encode_wav(&audio).unwrap();
        let decoded = decode_pcm16(&wav[WAV_HEADER_LEN..], 24_000, channels).unwrap();

        assert_eq!(decoded.channel_count(), channels);
        assert_eq!(decoded.frame_count(), frames);
        for (original, restored) in audio.channels().iter().zip(decoded.channels()) {
            for (a, b) in original.iter().zip(restored) {
                assert!((a - b).abs() <= 1.0 / 32768.0, "{a} vs {b}");
            }
        }

        assert_eq!(encode_wav(&decoded).unwrap(), wav);
    }
}

#[test]
fn decode_wav_reads_back_encoded_audio() {
    let bytes: Vec<u8> = [0i16, 100, -100, i16::MAX, i16::MIN, 1]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    let audio = decode_pcm16(&bytes, 16_000, 2).unwrap();
    let wav = encode_wav(&audio).unwrap();

    let (header, data) = WavHeader::parse(&wav).unwrap();
    assert_eq!(header.format(), PcmFormat::new(16_000, 2));
    assert_eq!(header.chunk_size(), 36 + 12);
    assert_eq!(data, bytes.as_slice());

    let restored = decode_wav(&wav).unwrap();
    assert_eq!(restored, audio);
    assert_eq!(encode_pcm16(&restored), bytes);
}

#[test]
fn wav_header_parse_skips_unknown_chunks() {
    let wav = riff(&[
        chunk(b"fmt ", &fmt_body(1, 1, 24_000, 16)),
        chunk(b"LIST", b"INFOsoft"),
        chunk(b"junk", &[1, 2, 3]),
        chunk(b"data", &[0x01, 0x00, 0xFF, 0xFF]),
    ]);
    let (header, data) = WavHeader::parse(&wav).unwrap();
    assert_eq!(header.sample_rate, 24_000);
    assert_eq!(header.channels, 1);
    assert_eq!(data, &[0x01, 0x00, 0xFF, 0xFF]);
}

#[test]
fn wav_header_parse_rejects_bad_signature() {
    let err = WavHeader::parse(b"RIFX\x00\x00\x00\x00WAVE").unwrap_err();
    assert!(matches!(err, AudioError::InvalidContainer(_)), "{err:?}");

    let err = WavHeader::parse(b"RIFF").unwrap_err();
    assert!(matches!(err, AudioError::InvalidContainer(_)), "{err:?}");
}

#[test]
fn wav_header_parse_rejects_truncated_data_chunk() {
    let mut wav = riff(&[
        chunk(b"fmt ", &fmt_body(1, 1, 24_000, 16)),
        chunk(b"data", &[0, 0, 0, 0]),
    ]);
    wav.truncate(wav.len() - 2);
    let err = WavHeader::parse(&wav).unwrap_err();
    assert!(matches!(err, AudioError::InvalidContainer(_)), "{err:?}");
}

#[test]
fn wav_header_parse_rejects_missing_chunks() {
    let err = WavHeader::parse(&riff(&[chunk(b"fmt ", &fmt_body(1, 1, 24_000, 16))]))
        .unwrap_err();
    assert!(matches!(err, AudioError::InvalidContainer(_)), "{err:?}");

    let err = WavHeader::parse(&riff(&[chunk(b"data", &[0, 0])])).unwrap_err();
    assert!(matches!(err, AudioError::InvalidContainer(_)), "{err:?}");
}

#[test]
fn wav_header_parse_rejects_non_pcm16() {
    let float_wav = riff(&[
        chunk(b"fmt ", &fmt_body(3, 1, 24_000, 32)),
        chunk(b"data", &[0, 0, 0, 0]),
    ]);
    let err = WavHeader::parse(&float_wav).unwrap_err();
    assert!(matches!(err, AudioError::Unsupported(_)), "{err:?}");

    let pcm8_wav = riff(&[
        chunk(b"fmt ", &fmt_body(1, 1, 24_000, 8)),
        chunk(b"data", &[0, 0]),
    ]);
    let err = WavHeader::parse(&pcm8_wav).unwrap_err();
    assert!(matches!(err, AudioError::Unsupported(_)), "{err:?}");
}

#[test]
fn decode_wav_rejects_partial_frames() {
    let wav = riff(&[
        chunk(b"fmt ", &fmt_body(1, 2, 24_000, 16)),
        chunk(b"data", &[0, 0, 0, 0, 0, 0]),
    ]);
    let err = decode_wav(&wav).unwrap_err();
    assert!(matches!(err, AudioError::TruncatedAudio(_)), "{err:?}");
}

#[test]
fn wav_header_rejects_zero_format() {
    let err = WavHeader::pcm16(PcmFormat::new(0, 1), 0).unwrap_err();
    assert!(matches!(err, AudioError::InvalidAudioState(_)), "{err:?}");
}
