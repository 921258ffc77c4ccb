// src/audio.rs
//
// Wraps the raw PCM returned by the TTS model into a playable WAV file.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// TTS output format: single channel, 16-bit signed little-endian
pub const TTS_SAMPLE_RATE: u32 = 24_000;
pub const TTS_CHANNELS: u16 = 1;
pub const TTS_BITS_PER_SAMPLE: u16 = 16;

pub fn tts_spec() -> WavSpec {
    WavSpec {
        channels: TTS_CHANNELS,
        sample_rate: TTS_SAMPLE_RATE,
        bits_per_sample: TTS_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Prepend a WAV header to raw TTS PCM. A trailing odd byte is dropped.
pub fn pcm_to_wav(pcm: &[u8]) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = WavWriter::new(&mut cursor, tts_spec())?;
        for chunk in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Playback length of raw TTS PCM
pub fn pcm_duration_secs(pcm: &[u8]) -> f64 {
    let bytes_per_second = TTS_SAMPLE_RATE as f64 * TTS_CHANNELS as f64 * (TTS_BITS_PER_SAMPLE / 8) as f64;
    pcm.len() as f64 / bytes_per_second
}
