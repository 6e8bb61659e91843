//! Headless host loop: owns the frame schedule the simulator deliberately lacks.

use std::io::Write;

use pulsenet::time::{Duration, Instant};
use pulsenet::{Phase, SimStats, Simulator, TickOutcome};
use serde::Serialize;
use tracing::info;

use crate::error::DriverError;

/// Wall-clock frame timer.
///
/// Gaps longer than `max_dt` (a stalled process, a debugger pause) are clamped
/// so one late frame does not fast-forward the animation.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last: Instant::now(),
            max_dt,
        }
    }

    /// Seconds since the previous call (or construction), clamped to `max_dt`.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.clamp(0.0, self.max_dt)
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub frames: u64,
    pub fps: f32,
    /// Frame index after which the viewport reports itself hidden.
    pub hidden_after: Option<u64>,
    pub json: bool,
    pub realtime: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 600,
            fps: 60.0,
            hidden_after: None,
            json: false,
            realtime: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub final_phase: Phase,
    pub live_signals: usize,
    pub stats: SimStats,
}

/// Drive `sim` for `opts.frames` frames, writing frame output to `out`.
///
/// With `json` every frame's render state is written as one JSON line;
/// otherwise one line per wave.
pub fn run<W: Write>(
    sim: &mut Simulator,
    opts: &RunOptions,
    out: &mut W,
) -> Result<RunSummary, DriverError> {
    let frame_dt = 1.0 / opts.fps;
    let mut clock = opts.realtime.then(|| FrameClock::new(frame_dt * 4.0));

    info!(frames = opts.frames, fps = opts.fps, realtime = opts.realtime, "run started");

    for frame in 0..opts.frames {
        if opts.hidden_after == Some(frame) {
            info!(frame, "viewport hidden");
            sim.set_visible(false);
        }

        let started = Instant::now();
        let dt = match clock.as_mut() {
            Some(clock) => clock.delta(),
            None => frame_dt,
        };

        let outcome = sim.tick(dt);
        if opts.json {
            serde_json::to_writer(&mut *out, &sim.render_state())?;
            writeln!(out)?;
        } else if let TickOutcome::Advanced { spawned, .. } = outcome {
            if spawned > 0 {
                writeln!(
                    out,
                    "t={:>7.3}s frame={:>5} phase={:<8} wave={}",
                    sim.time_s(),
                    frame,
                    sim.phase().as_str(),
                    spawned
                )?;
            }
        }

        if opts.realtime {
            let rest = Duration::try_from_secs_f32(frame_dt)
                .ok()
                .and_then(|budget| budget.checked_sub(started.elapsed()));
            if let Some(rest) = rest {
                std::thread::sleep(rest);
            }
        }
    }

    let summary = RunSummary {
        frames: opts.frames,
        final_phase: sim.phase(),
        live_signals: sim.signals().len(),
        stats: sim.stats().clone(),
    };
    info!(
        phase_flips = summary.stats.phase_flips,
        waves = summary.stats.waves_spawned,
        "run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsenet::SimConfig;

    fn sim() -> Simulator {
        let mut sim = Simulator::new(SimConfig::default().with_seed(5)).unwrap();
        sim.resize(800.0, 400.0);
        sim
    }

    #[test]
    fn fixed_step_run_reports_waves() {
        let mut sim = sim();
        let opts = RunOptions {
            frames: 100,
            fps: 10.0,
            ..Default::default()
        };
        let mut out = Vec::new();
        let summary = run(&mut sim, &opts, &mut out).unwrap();

        // 10 s at 0.1 s per frame: forward, backward, forward.
        assert_eq!(summary.stats.phase_flips, 2);
        assert_eq!(summary.final_phase, Phase::Forward);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().contains("phase=backward"));
    }

    #[test]
    fn hidden_viewport_stops_time() {
        let mut sim = sim();
        let opts = RunOptions {
            frames: 50,
            fps: 10.0,
            hidden_after: Some(10),
            ..Default::default()
        };
        let summary = run(&mut sim, &opts, &mut Vec::new()).unwrap();
        assert_eq!(summary.stats.ticks, 10);
        assert_eq!(summary.stats.suppressed_ticks, 40);
    }

    #[test]
    fn json_mode_writes_one_snapshot_per_frame() {
        let mut sim = sim();
        let opts = RunOptions {
            frames: 3,
            json: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        run(&mut sim, &opts, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let frames: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0]["phase"], "forward");
        assert_eq!(frames[0]["signals"].as_array().unwrap().len(), 12);
        assert_eq!(frames[0]["connections"].as_array().unwrap().len(), 20);
    }

    #[test]
    fn glacial_frame_rate_still_finishes() {
        let mut sim = sim();
        let opts = RunOptions {
            frames: 2,
            fps: 1.0e-9,
            ..Default::default()
        };
        let summary = run(&mut sim, &opts, &mut Vec::new()).unwrap();
        assert_eq!(summary.stats.ticks, 2);
        // Each frame spans about 1e9 s, an even number of 4 s phases.
        assert!(summary.stats.phase_flips >= 500_000_000);
        assert_eq!(summary.final_phase, Phase::Forward);
    }

    #[test]
    fn frame_clock_clamps_long_gaps() {
        let mut clock = FrameClock::new(0.05);
        std::thread::sleep(Duration::from_millis(80));
        let dt = clock.delta();
        assert!(dt <= 0.05);
        assert!(dt > 0.0);
    }
}
