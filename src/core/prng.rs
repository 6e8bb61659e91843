// Randomness used at spawn time (pulse offsets, wave targets, cosmetics).
//
// This is NOT cryptographically secure. Every random draw in the simulator goes
// through `RandomSource`, so tests can swap in a scripted sequence and assert
// exact wave composition.

/// Source of uniform random numbers.
///
/// Only `next_f32_01` is required; the range helpers are derived from it so a
/// scripted source controls every draw.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f32_01(&mut self) -> f32;

    #[inline]
    fn gen_range_f32(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32_01()
    }

    /// Uniform index in `[low, high)`. Returns `low` for an empty range.
    #[inline]
    fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = high - low;
        let v = (self.next_f32_01() * span as f32) as usize;
        low + v.min(span - 1)
    }

    #[inline]
    fn coin_flip(&mut self) -> bool {
        self.next_f32_01() < 0.5
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn next_f32_01(&mut self) -> f32 {
        (**self).next_f32_01()
    }
}

/// Seeded xorshift64* generator; the default source.
#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Seed from the wall clock. Used when the config does not pin a seed.
    pub fn from_entropy() -> Self {
        use crate::time::{SystemTime, UNIX_EPOCH};

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

impl RandomSource for Prng {
    #[inline]
    fn next_f32_01(&mut self) -> f32 {
        // 24 mantissa bits keep the result strictly below 1.0.
        let x = self.next_u32() >> 8;
        (x as f32) / ((1u32 << 24) as f32)
    }
}

/// Replays a fixed sequence of samples, cycling when exhausted.
///
/// Samples are clamped into `[0, 1)`. An empty script always yields `0.0`.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(samples: impl Into<Vec<f32>>) -> Self {
        Self {
            samples: samples.into(),
            cursor: 0,
        }
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_f32_01(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let v = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        v.clamp(0.0, 0.999_999)
    }
}
