//! The simulator instance: owns topology, phase clock, live signals and host
//! inputs, and advances them in a fixed order on every tick.
//!
//! Tick order: activity gate, phase advance, (on phase start) wave reseed,
//! signal advance. Rendering is a separate read-only step; see
//! [`Simulator::render_state`].

#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::{check_layers, ConfigError, SimConfig};
use crate::gate::ActivityGate;
use crate::phase::{Phase, PhaseScheduler};
use crate::prng::{Prng, RandomSource};
use crate::render::{RenderAdapter, RenderState};
use crate::signal::{Signal, SignalTracker};
use crate::topology::{LayerSizes, NeuronId, Point, Topology};
use crate::wave::WaveGenerator;

/// Running counters. Purely informational.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SimStats {
    pub ticks: u64,
    pub suppressed_ticks: u64,
    pub phase_flips: u64,
    pub waves_spawned: u64,
    pub signals_spawned: u64,
    pub signals_completed: u64,
    /// Signals dropped by a phase flip or topology rebuild before finishing.
    pub signals_discarded: u64,
    pub topology_builds: u64,
}

/// What a call to [`Simulator::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The activity gate is closed; nothing changed.
    Suppressed,
    /// Zero, negative or non-finite delta; nothing changed.
    Idle,
    Advanced {
        /// A phase flip happened during this tick.
        phase_started: bool,
        /// Signals in the wave spawned this tick (0 when no wave was due).
        spawned: usize,
        /// Signals that finished their path this tick.
        completed: usize,
    },
}

pub struct Simulator<R: RandomSource = Prng> {
    config: SimConfig,
    rng: R,
    viewport: (f32, f32),
    topology: Topology,
    scheduler: PhaseScheduler,
    waves: WaveGenerator,
    tracker: SignalTracker,
    gate: ActivityGate,
    hover: Option<NeuronId>,
    time_s: f64,
    // Set when the current phase has started but its wave is not out yet.
    wave_pending: bool,
    stats: SimStats,
}

impl Simulator<Prng> {
    /// Create a simulator with the default random source, seeded from
    /// `config.seed` (or the wall clock when unset).
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let rng = config.seed.map(Prng::new).unwrap_or_else(Prng::from_entropy);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> Simulator<R> {
    /// Create a simulator drawing all randomness from `rng`.
    ///
    /// The topology starts empty until the first [`Simulator::resize`].
    pub fn with_rng(config: SimConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scheduler: PhaseScheduler::new(config.phase_duration_s),
            tracker: SignalTracker::new(config.travel_duration_s),
            config,
            rng,
            viewport: (0.0, 0.0),
            topology: Topology::empty(),
            waves: WaveGenerator::new(),
            gate: ActivityGate::default(),
            hover: None,
            time_s: 0.0,
            wave_pending: true,
            stats: SimStats::default(),
        })
    }

    /// Supply the host viewport size. Rebuilds the topology only when the size
    /// changed; returns whether a rebuild happened.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if self.viewport == (width, height) && self.stats.topology_builds > 0 {
            return false;
        }
        self.viewport = (width, height);
        self.rebuild();
        true
    }

    /// Change the layer sizes and rebuild at the current viewport.
    ///
    /// Sizes over the neuron or connection limit are rejected and leave the
    /// current topology in place.
    pub fn set_layers(&mut self, layers: LayerSizes) -> Result<(), ConfigError> {
        check_layers(layers)?;
        if self.config.layers == layers {
            return Ok(());
        }
        self.config.layers = layers;
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        let (width, height) = self.viewport;
        let topology = Topology::build(
            self.config.layers,
            width,
            height,
            self.config.padding,
            &mut self.rng,
        );
        // Old signals reference the old connection ids.
        let discarded = self.tracker.clear();
        self.topology = topology;
        self.stats.signals_discarded += discarded as u64;
        self.stats.topology_builds += 1;
        if self.hover.is_some_and(|id| self.topology.neuron(id).is_none()) {
            self.hover = None;
        }
        // Reseed the current phase on the next active tick.
        self.wave_pending = true;

        debug!(
            width,
            height,
            neurons = self.topology.neurons().len(),
            connections = self.topology.connections().len(),
            discarded,
            "topology rebuilt"
        );
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.gate.visible = visible;
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.gate.reduced_motion = reduced_motion;
    }

    /// Set the hovered neuron. Ids outside the current topology clear it.
    pub fn set_hover(&mut self, hover: Option<NeuronId>) {
        self.hover = hover.filter(|&id| self.topology.neuron(id).is_some());
    }

    /// Nearest neuron within `radius` of `(x, y)`.
    pub fn neuron_at(&self, x: f32, y: f32, radius: f32) -> Option<NeuronId> {
        self.topology.neuron_at(Point::new(x, y), radius)
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if !self.gate.is_open() {
            self.stats.suppressed_ticks += 1;
            trace!(
                visible = self.gate.visible,
                reduced_motion = self.gate.reduced_motion,
                "tick suppressed"
            );
            return TickOutcome::Suppressed;
        }
        if !dt.is_finite() || dt <= 0.0 {
            return TickOutcome::Idle;
        }

        self.stats.ticks += 1;
        self.time_s += f64::from(dt);

        let flips = self.scheduler.advance(dt);
        if flips > 0 {
            self.stats.phase_flips += u64::from(flips);
            self.wave_pending = true;
            debug!(phase = self.scheduler.phase().as_str(), flips, "phase flipped");
        }

        let spawned = if self.wave_pending {
            self.spawn_wave()
        } else {
            0
        };

        let completed = self.tracker.advance(dt);
        self.stats.signals_completed += completed as u64;

        TickOutcome::Advanced {
            phase_started: flips > 0,
            spawned,
            completed,
        }
    }

    fn spawn_wave(&mut self) -> usize {
        self.wave_pending = false;
        let phase = self.scheduler.phase();
        let wave = self.waves.spawn(phase, &self.topology, &mut self.rng);
        let spawned = wave.len();
        // Wholesale swap: nothing from the previous phase survives.
        let discarded = self.tracker.replace(wave);

        self.stats.signals_discarded += discarded as u64;
        self.stats.signals_spawned += spawned as u64;
        if spawned > 0 {
            self.stats.waves_spawned += 1;
        }
        debug!(phase = phase.as_str(), spawned, discarded, "wave spawned");
        spawned
    }

    /// Snapshot for the drawing collaborator.
    pub fn render_state(&self) -> RenderState {
        RenderAdapter::new(self).snapshot()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn signals(&self) -> &[Signal] {
        self.tracker.signals()
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Time spent in the current phase.
    pub fn phase_elapsed_s(&self) -> f32 {
        self.scheduler.elapsed_s()
    }

    pub fn phase_progress(&self) -> f32 {
        self.scheduler.progress()
    }

    /// Total simulated time across active ticks.
    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    pub fn hover(&self) -> Option<NeuronId> {
        self.hover
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }
}
