//! # pulsenet
//!
//! A layered signal-propagation simulator: pulses travel through a small
//! feed-forward network visualization (input, hidden, output), alternating
//! between a `forward` and a `backward` phase.
//!
//! The crate only simulates. The host owns the frame loop and calls
//! [`Simulator::tick`] with the elapsed time, then hands
//! [`Simulator::render_state`] to whatever draws.
//!
//! ## Quick Start
//!
//! ```
//! use pulsenet::prelude::*;
//!
//! let mut sim = Simulator::new(SimConfig::default().with_seed(42)).unwrap();
//! sim.resize(800.0, 400.0);
//!
//! sim.tick(1.0 / 60.0);
//! let frame = sim.render_state();
//! assert_eq!(frame.phase, Phase::Forward);
//! assert_eq!(frame.signals.len(), 12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization of config and render snapshots, JSON config parsing
//!
//! ## Modules
//!
//! - [`topology`]: neuron layout and full inter-layer wiring
//! - [`phase`]: the forward/backward clock
//! - [`wave`]: per-phase signal batches
//! - [`signal`]: live signal advancement
//! - [`gate`]: visibility / reduced-motion policy
//! - [`render`]: read-only snapshots for drawing
//! - [`simulator`]: the instance tying it all together

#[path = "core/config.rs"]
pub mod config;

#[path = "core/gate.rs"]
pub mod gate;

#[path = "core/phase.rs"]
pub mod phase;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/render.rs"]
pub mod render;

#[path = "core/signal.rs"]
pub mod signal;

#[path = "core/simulator.rs"]
pub mod simulator;

#[path = "core/topology.rs"]
pub mod topology;

#[path = "core/wave.rs"]
pub mod wave;

pub mod time;

pub use config::{ConfigError, SimConfig, MAX_CONNECTIONS, MAX_NEURONS};
pub use phase::Phase;
pub use render::RenderState;
pub use simulator::{SimStats, Simulator, TickOutcome};
pub use topology::{Layer, LayerSizes, NeuronId};

pub mod prelude {
    pub use crate::config::{ConfigError, SimConfig};
    pub use crate::gate::ActivityGate;
    pub use crate::phase::Phase;
    pub use crate::prng::{Prng, RandomSource, ScriptedSource};
    pub use crate::render::{ConnectionRender, NeuronRender, RenderState, SignalRender};
    pub use crate::signal::{Signal, SignalId};
    pub use crate::simulator::{SimStats, Simulator, TickOutcome};
    pub use crate::topology::{Layer, LayerSizes, NeuronId, Point, Topology};
}
