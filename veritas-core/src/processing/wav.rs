//! Mono WAV encoding for captured audio.
//!
//! Live captures are delivered as f32 sample buffers at whatever rate the
//! device negotiated; before classification they are downmixed, resampled
//! to the configured rate, and wrapped in a standard 44-byte RIFF header
//! as 16-bit PCM. Pure math, no platform dependencies.

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Generate a 44-byte WAV RIFF header (PCM format code 1, little-endian).
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    file size - 8 (36 + data_size)
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
pub fn wav_header(sample_rate: u32, bit_depth: u16, channels: u16, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = sample_rate * channels as u32 * bit_depth as u32 / 8;
    let block_align = channels * bit_depth / 8;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Encode mono f32 samples as a complete 16-bit PCM WAV file.
pub fn encode_wav_mono(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let pcm = pcm16_from_f32(samples);
    let mut out = Vec::with_capacity(WAV_HEADER_SIZE + pcm.len());
    out.extend_from_slice(&wav_header(sample_rate, 16, 1, pcm.len() as u32));
    out.extend_from_slice(&pcm);
    out
}

/// Convert f32 samples `[-1.0, 1.0]` to 16-bit PCM (little-endian bytes).
///
/// Clamps out-of-range values. Output length = `samples.len() * 2` bytes.
pub fn pcm16_from_f32(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let int16_value = (clamped * i16::MAX as f32) as i16;
        data.extend_from_slice(&int16_value.to_le_bytes());
    }
    data
}

/// Downmix interleaved multi-channel audio to mono by averaging channels
/// per frame.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let frame_count = samples.len() / channels;
    let scale = 1.0 / channels as f32;
    let mut mono = Vec::with_capacity(frame_count);
    for frame in 0..frame_count {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += samples[frame * channels + ch];
        }
        mono.push(sum * scale);
    }
    mono
}

/// Linear interpolation resampling for mono audio.
///
/// Returns input unchanged if rates already match.
pub fn resample_mono(samples: &[f32], source_rate: f64, target_rate: f64) -> Vec<f32> {
    if (source_rate - target_rate).abs() < 0.01 || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = target_rate / source_rate;
    let output_count = (samples.len() as f64 * ratio) as usize;
    if output_count == 0 {
        return Vec::new();
    }

    let mut output = vec![0.0f32; output_count];
    for (i, sample) in output.iter_mut().enumerate() {
        let source_index = i as f64 / ratio;
        let index = source_index as usize;
        let fraction = (source_index - index as f64) as f32;

        if index + 1 < samples.len() {
            *sample = samples[index] * (1.0 - fraction) + samples[index + 1] * fraction;
        } else if index < samples.len() {
            *sample = samples[index];
        }
    }
    output
}

/// Compute RMS level of samples (0.0–1.0 range for normalized audio).
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Compute peak absolute level of samples.
pub fn peak_level(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}
