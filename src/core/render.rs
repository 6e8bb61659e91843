use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::phase::Phase;
use crate::prng::{Prng, RandomSource};
use crate::signal::SignalId;
use crate::simulator::Simulator;
use crate::topology::{ConnectionId, Layer, NeuronId, Point};

/// Idle glow in `[0, 1]`: `0.5 + 0.5 * sin(time * rate + offset)`.
///
/// The time term is wrapped to one turn in f64 before narrowing, so the glow
/// keeps moving after days of accumulated time.
#[inline]
pub fn pulse_intensity(time_s: f64, pulse_offset: f32, rate: f32) -> f32 {
    let angle = (time_s * f64::from(rate)).rem_euclid(core::f64::consts::TAU) as f32;
    0.5 + 0.5 * (angle + pulse_offset).sin()
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NeuronRender {
    pub id: NeuronId,
    pub position: Point,
    pub layer: Layer,
    pub index: usize,
    pub pulse: f32,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ConnectionRender {
    pub id: ConnectionId,
    pub from: Point,
    pub to: Point,
    /// Live signals currently on this connection.
    pub active: u32,
    /// Touches the hovered neuron.
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SignalRender {
    pub id: SignalId,
    pub direction: Phase,
    pub position: Point,
    pub path_index: usize,
    pub progress: f32,
    pub color: &'static str,
    pub size: f32,
    /// Trailing points, nearest first. Empty unless the signal has a trail.
    pub trail: Vec<Point>,
}

/// Read-only frame for a drawing routine.
///
/// Built on demand; holding one never affects the simulator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RenderState {
    pub phase: Phase,
    /// Fraction of the current phase elapsed, `[0, 1)`.
    pub phase_progress: f32,
    /// Accumulated active simulation time, narrowed for export.
    pub time_s: f32,
    pub width: f32,
    pub height: f32,
    pub neurons: Vec<NeuronRender>,
    pub connections: Vec<ConnectionRender>,
    pub signals: Vec<SignalRender>,
}

impl RenderState {
    pub fn highlighted_neuron(&self) -> Option<&NeuronRender> {
        self.neurons.iter().find(|n| n.highlighted)
    }
}

pub struct RenderAdapter<'a, R: RandomSource = Prng> {
    sim: &'a Simulator<R>,
}

impl<'a, R: RandomSource> RenderAdapter<'a, R> {
    pub fn new(sim: &'a Simulator<R>) -> Self {
        Self { sim }
    }

    pub fn snapshot(&self) -> RenderState {
        let sim = self.sim;
        let cfg = sim.config();
        let topo = sim.topology();
        let hover = sim.hover();
        let time_s = sim.time_s();

        let neurons = topo
            .neurons()
            .iter()
            .enumerate()
            .map(|(id, n)| NeuronRender {
                id,
                position: n.position,
                layer: n.layer,
                index: n.index,
                pulse: pulse_intensity(time_s, n.pulse_offset, cfg.pulse_rate),
                highlighted: hover == Some(id),
            })
            .collect();

        let mut load: HashMap<ConnectionId, u32> = HashMap::new();
        for s in sim.signals() {
            *load.entry(s.current_connection()).or_insert(0) += 1;
        }

        let connections = topo
            .connections()
            .iter()
            .enumerate()
            .filter_map(|(id, c)| {
                Some(ConnectionRender {
                    id,
                    from: topo.neuron(c.from)?.position,
                    to: topo.neuron(c.to)?.position,
                    active: load.get(&id).copied().unwrap_or(0),
                    highlighted: hover.is_some_and(|h| h == c.from || h == c.to),
                })
            })
            .collect();

        let signals = sim
            .signals()
            .iter()
            .filter_map(|s| {
                let (start, end) = s.segment(topo)?;
                let trail = if s.style.trail {
                    (1..=cfg.trail_length)
                        .map(|k| s.progress() - k as f32 * cfg.trail_spacing)
                        .take_while(|&p| p >= 0.0)
                        .map(|p| start.lerp(end, p))
                        .collect()
                } else {
                    Vec::new()
                };
                Some(SignalRender {
                    id: s.id,
                    direction: s.direction,
                    position: start.lerp(end, s.progress()),
                    path_index: s.path_index(),
                    progress: s.progress(),
                    color: s.style.color,
                    size: s.style.size,
                    trail,
                })
            })
            .collect();

        RenderState {
            phase: sim.phase(),
            phase_progress: sim.phase_progress(),
            time_s: time_s as f32,
            width: topo.width(),
            height: topo.height(),
            neurons,
            connections,
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_stays_in_unit_range() {
        for i in 0..200 {
            let t = f64::from(i) * 0.137;
            let p = pulse_intensity(t, 1.3, 2.0);
            assert!((0.0..=1.0).contains(&p));
        }
        assert!((pulse_intensity(0.0, 0.0, 2.0) - 0.5).abs() < 1e-6);
        assert!((pulse_intensity(0.0, core::f32::consts::FRAC_PI_2, 2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pulse_keeps_moving_after_days_of_runtime() {
        let six_days = 6.0 * 86_400.0;
        let a = pulse_intensity(six_days, 0.4, 2.0);
        let b = pulse_intensity(six_days + 1.0 / 60.0, 0.4, 2.0);
        assert!((a - b).abs() > 1e-4, "{a} vs {b}");
    }
}
