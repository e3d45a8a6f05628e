/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// Fixed effects are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::PI;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_crash: Arc<Vec<u8>>,
        sfx_restart: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_crash: Arc::new(make_wav(&gen_crash())),
                sfx_restart: Arc::new(make_wav(&gen_restart())),
            })
        }

        fn play(&self, buf: Vec<u8>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = rodio::Decoder::new(Cursor::new(buf)) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        /// Apple bite. Pitch climbs with speed so the tempo change is audible.
        pub fn play_eat(&self, speed: u32) {
            let ratio = (speed.saturating_sub(20) as f32 / 80.0).min(1.0);
            self.play(make_wav(&gen_bite(660.0 + ratio * 660.0)));
        }

        pub fn play_crash(&self) { self.play(self.sfx_crash.as_ref().clone()); }
        pub fn play_restart(&self) { self.play(self.sfx_restart.as_ref().clone()); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(samples: &mut Vec<f32>, freq: f32, duration: f32, volume: f32) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            // Sine + 3rd harmonic for a square-ish retro edge
            let wave = (t * freq * 2.0 * PI).sin() * 0.7
                + (t * freq * 3.0 * 2.0 * PI).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }

    /// Bite: two quick notes, a fifth apart
    fn gen_bite(base: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        tone(&mut samples, base, 0.04, 0.25);
        tone(&mut samples, base * 1.5, 0.05, 0.25);
        samples
    }

    /// Crash: noisy descending sweep
    fn gen_crash() -> Vec<f32> {
        let duration = 0.45;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 0x5EED;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 420.0 - t * 320.0; // 420Hz → 100Hz
                let ti = i as f32 / SAMPLE_RATE as f32;
                let sweep = (ti * freq * 2.0 * PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(1.2);
                (sweep * 0.7 + noise * 0.3) * env * 0.3
            })
            .collect()
    }

    /// Restart: rising C-E-G arpeggio
    fn gen_restart() -> Vec<f32> {
        let mut samples = Vec::new();
        for freq in [523.0_f32, 659.0, 784.0] {
            tone(&mut samples, freq, 0.06, 0.25);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a 16-bit mono PCM buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_eat(&self, _speed: u32) {}
    pub fn play_crash(&self) {}
    pub fn play_restart(&self) {}
}
