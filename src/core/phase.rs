#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current propagation direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    #[default]
    Forward,
    Backward,
}

impl Phase {
    pub fn flipped(self) -> Phase {
        match self {
            Phase::Forward => Phase::Backward,
            Phase::Backward => Phase::Forward,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Forward => "forward",
            Phase::Backward => "backward",
        }
    }
}

/// Relative slack on the flip threshold. Host deltas are f32, so a run of
/// frames meant to sum to one dwell can land a few ulps short of it.
const FLIP_TOLERANCE: f64 = 1e-6;

/// Two-state clock alternating `Forward` and `Backward` every `dwell_s` seconds.
///
/// Elapsed time is kept in f64 so long runs of small f32 deltas still add up.
#[derive(Debug, Clone)]
pub struct PhaseScheduler {
    phase: Phase,
    elapsed_s: f64,
    dwell_s: f32,
}

impl PhaseScheduler {
    pub fn new(dwell_s: f32) -> Self {
        Self {
            phase: Phase::Forward,
            elapsed_s: 0.0,
            dwell_s,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time spent in the current phase.
    pub fn elapsed_s(&self) -> f32 {
        self.elapsed_s as f32
    }

    pub fn dwell_s(&self) -> f32 {
        self.dwell_s
    }

    /// Fraction of the current phase already elapsed, in `[0, 1)`.
    pub fn progress(&self) -> f32 {
        (self.elapsed_s / f64::from(self.dwell_s)).clamp(0.0, 0.999_999) as f32
    }

    /// Advance by `dt` seconds and return how many flips happened.
    ///
    /// Overflow past the dwell carries into the next phase, so any sequence of
    /// increments summing to `k * dwell` yields exactly `k` flips. A non-zero
    /// return means a new phase started during this call. Non-positive or
    /// non-finite `dt` is ignored.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }

        let dwell = f64::from(self.dwell_s);
        self.elapsed_s += f64::from(dt);
        let cycles = ((self.elapsed_s + dwell * FLIP_TOLERANCE) / dwell).floor();
        if cycles < 1.0 {
            return 0;
        }

        self.elapsed_s = (self.elapsed_s - cycles * dwell).clamp(0.0, dwell);
        if cycles % 2.0 == 1.0 {
            self.phase = self.phase.flipped();
        }
        // Saturating float-to-int cast.
        cycles as u32
    }
}
