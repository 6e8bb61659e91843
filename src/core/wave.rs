//! Wave construction: one synchronized batch of signals per phase start.
//!
//! Forward: every (input `i`, hidden `h`) pair spawns
//! `input(i) -> hidden(h) -> output(o)` with `o` drawn per signal.
//! Backward: every (output `o`, hidden `h`) pair spawns
//! `output(o) -> hidden(h) -> input(i)` with `i` drawn per signal.
//!
//! Secondary targets are drawn independently for each signal, so signals
//! leaving the same neuron do not share a destination.

use crate::phase::Phase;
use crate::prng::RandomSource;
use crate::signal::{Signal, SignalId, SignalStyle};
use crate::topology::Topology;

pub const FORWARD_PALETTE: [&str; 4] = ["#38bdf8", "#22d3ee", "#818cf8", "#a5b4fc"];
pub const BACKWARD_PALETTE: [&str; 4] = ["#f472b6", "#fb923c", "#fbbf24", "#f87171"];

/// Signal radius range `[low, high)`.
pub const SIZE_RANGE: (f32, f32) = (2.0, 4.5);

pub fn palette(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Forward => &FORWARD_PALETTE,
        Phase::Backward => &BACKWARD_PALETTE,
    }
}

/// Builds waves and hands out signal ids (unique per generator).
#[derive(Debug, Clone, Default)]
pub struct WaveGenerator {
    next_id: SignalId,
}

impl WaveGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next spawned signal will receive.
    pub fn next_id(&self) -> SignalId {
        self.next_id
    }

    /// Build the wave for `phase` over `topology`.
    ///
    /// Yields no signals when any layer is empty. Per signal the random draws
    /// are, in order: secondary target, size, trail flag.
    pub fn spawn<R: RandomSource>(
        &mut self,
        phase: Phase,
        topology: &Topology,
        rng: &mut R,
    ) -> Vec<Signal> {
        let sizes = topology.sizes();
        if sizes.any_empty() {
            return Vec::new();
        }

        let colors = palette(phase);
        let (outer_n, far_n) = match phase {
            Phase::Forward => (sizes.input, sizes.output),
            Phase::Backward => (sizes.output, sizes.input),
        };

        let mut wave = Vec::with_capacity(outer_n * sizes.hidden);
        for outer in 0..outer_n {
            for h in 0..sizes.hidden {
                let far = rng.gen_range_usize(0, far_n);
                let path = match phase {
                    Phase::Forward => [topology.input_hidden(outer, h), topology.hidden_output(h, far)],
                    Phase::Backward => [topology.hidden_output(h, outer), topology.input_hidden(far, h)],
                };
                let style = SignalStyle {
                    color: colors[(outer + h) % colors.len()],
                    size: rng.gen_range_f32(SIZE_RANGE.0, SIZE_RANGE.1),
                    trail: rng.coin_flip(),
                };

                let Some(path) = path.into_iter().collect::<Option<Vec<_>>>() else {
                    continue;
                };
                if let Some(signal) = Signal::new(self.next_id, path, phase, style) {
                    self.next_id += 1;
                    wave.push(signal);
                }
            }
        }
        wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::{Prng, ScriptedSource};
    use crate::topology::{Layer, LayerSizes};

    fn topo(sizes: LayerSizes) -> Topology {
        Topology::build(sizes, 800.0, 400.0, 60.0, &mut Prng::new(11))
    }

    fn endpoint_layers(t: &Topology, s: &Signal) -> Vec<(Layer, usize)> {
        let mut out = Vec::new();
        for &cid in s.path() {
            let c = t.connection(cid).unwrap();
            let (a, b) = match s.direction {
                Phase::Forward => (c.from, c.to),
                Phase::Backward => (c.to, c.from),
            };
            let (a, b) = (t.neuron(a).unwrap(), t.neuron(b).unwrap());
            if out.is_empty() {
                out.push((a.layer, a.index));
            }
            assert_eq!(out.last(), Some(&(a.layer, a.index)), "path must be contiguous");
            out.push((b.layer, b.index));
        }
        out
    }

    #[test]
    fn forward_wave_covers_every_input_hidden_pair() {
        let t = topo(LayerSizes::default());
        let wave = WaveGenerator::new().spawn(Phase::Forward, &t, &mut Prng::new(2));
        assert_eq!(wave.len(), 12);

        let mut pairs = Vec::new();
        for s in &wave {
            assert_eq!(s.direction, Phase::Forward);
            assert_eq!(s.path_index(), 0);
            assert_eq!(s.progress(), 0.0);
            let hops = endpoint_layers(&t, s);
            assert_eq!(hops.len(), 3);
            assert_eq!(hops[0].0, Layer::Input);
            assert_eq!(hops[1].0, Layer::Hidden);
            assert_eq!(hops[2].0, Layer::Output);
            pairs.push((hops[0].1, hops[1].1));
        }
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), 12);
    }

    #[test]
    fn backward_wave_covers_every_output_hidden_pair() {
        let t = topo(LayerSizes::default());
        let wave = WaveGenerator::new().spawn(Phase::Backward, &t, &mut Prng::new(2));
        assert_eq!(wave.len(), 8);
        for s in &wave {
            let hops = endpoint_layers(&t, s);
            assert_eq!(
                hops.iter().map(|h| h.0).collect::<Vec<_>>(),
                vec![Layer::Output, Layer::Hidden, Layer::Input]
            );
            assert!(BACKWARD_PALETTE.contains(&s.style.color));
        }
    }

    #[test]
    fn scripted_draws_pick_exact_targets_and_cosmetics() {
        let t = topo(LayerSizes::default());
        // Per signal: target, size, trail.
        let mut rng = ScriptedSource::new(vec![0.9, 0.0, 0.1, 0.1, 0.5, 0.8]);
        let wave = WaveGenerator::new().spawn(Phase::Forward, &t, &mut rng);
        assert_eq!(rng.draws(), 12 * 3);

        let first = &wave[0];
        assert_eq!(endpoint_layers(&t, first)[2], (Layer::Output, 1));
        assert_eq!(first.style.size, SIZE_RANGE.0);
        assert!(first.style.trail);
        assert_eq!(first.style.color, FORWARD_PALETTE[0]);

        let second = &wave[1];
        assert_eq!(endpoint_layers(&t, second)[2], (Layer::Output, 0));
        assert!((second.style.size - 3.25).abs() < 1e-5);
        assert!(!second.style.trail);
        assert_eq!(second.style.color, FORWARD_PALETTE[1]);
    }

    #[test]
    fn colors_cycle_by_pair_index() {
        let t = topo(LayerSizes::default());
        let wave = WaveGenerator::new().spawn(Phase::Forward, &t, &mut Prng::new(4));
        // Signal k sits at (outer, inner) = (k / 4, k % 4).
        for (k, s) in wave.iter().enumerate() {
            let expected = FORWARD_PALETTE[(k / 4 + k % 4) % FORWARD_PALETTE.len()];
            assert_eq!(s.style.color, expected);
        }
    }

    #[test]
    fn ids_are_unique_across_waves() {
        let t = topo(LayerSizes::default());
        let mut waves = WaveGenerator::new();
        let mut rng = Prng::new(9);
        let mut ids: Vec<SignalId> = waves
            .spawn(Phase::Forward, &t, &mut rng)
            .iter()
            .map(|s| s.id)
            .collect();
        ids.extend(waves.spawn(Phase::Backward, &t, &mut rng).iter().map(|s| s.id));
        let n = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), n);
        assert_eq!(waves.next_id(), 20);
    }

    #[test]
    fn empty_layer_or_viewport_spawns_nothing() {
        let mut waves = WaveGenerator::new();
        let mut rng = Prng::new(1);
        for sizes in [LayerSizes::new(0, 4, 2), LayerSizes::new(3, 0, 2), LayerSizes::new(3, 4, 0)] {
            let t = topo(sizes);
            assert!(waves.spawn(Phase::Forward, &t, &mut rng).is_empty());
            assert!(waves.spawn(Phase::Backward, &t, &mut rng).is_empty());
        }
        assert!(waves.spawn(Phase::Forward, &Topology::empty(), &mut rng).is_empty());
        assert_eq!(waves.next_id(), 0);
    }
}
