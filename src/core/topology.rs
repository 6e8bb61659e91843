//! Neuron placement and inter-layer wiring.
//!
//! Layout (viewport space, y grows downward like a canvas):
//! - input layer at `x = padding`, output layer at `x = width - padding`,
//!   hidden layer halfway between them
//! - neuron `i` of an `n`-neuron layer at `y = height * (i + 1) / (n + 1)`
//!
//! Neuron ids run input layer first, then hidden, then output. Connections are
//! stored row-major (`from` outer, `to` inner): all input→hidden edges, then all
//! hidden→output edges. That makes edge lookup pure arithmetic.

use core::f32::consts::TAU;
use core::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prng::RandomSource;

pub type NeuronId = usize;
pub type ConnectionId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Layer {
    Input,
    Hidden,
    Output,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Input, Layer::Hidden, Layer::Output];
}

/// Neuron count per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayerSizes {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

impl Default for LayerSizes {
    fn default() -> Self {
        Self::new(3, 4, 2)
    }
}

impl LayerSizes {
    pub const fn new(input: usize, hidden: usize, output: usize) -> Self {
        Self {
            input,
            hidden,
            output,
        }
    }

    pub const EMPTY: LayerSizes = LayerSizes::new(0, 0, 0);

    pub fn count(&self, layer: Layer) -> usize {
        match layer {
            Layer::Input => self.input,
            Layer::Hidden => self.hidden,
            Layer::Output => self.output,
        }
    }

    /// Neuron count; saturates instead of overflowing.
    pub fn total(&self) -> usize {
        self.checked_total().unwrap_or(usize::MAX)
    }

    /// Connection count; saturates instead of overflowing.
    pub fn connection_count(&self) -> usize {
        self.checked_connection_count().unwrap_or(usize::MAX)
    }

    pub fn checked_total(&self) -> Option<usize> {
        self.input.checked_add(self.hidden)?.checked_add(self.output)
    }

    pub fn checked_connection_count(&self) -> Option<usize> {
        let front = self.input.checked_mul(self.hidden)?;
        let back = self.hidden.checked_mul(self.output)?;
        front.checked_add(back)
    }

    pub fn any_empty(&self) -> bool {
        self.input == 0 || self.hidden == 0 || self.output == 0
    }

    fn offset(&self, layer: Layer) -> usize {
        match layer {
            Layer::Input => 0,
            Layer::Hidden => self.input,
            Layer::Output => self.input + self.hidden,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neuron {
    pub position: Point,
    pub layer: Layer,
    /// Position within its layer.
    pub index: usize,
    /// Phase offset of the idle glow (radians, `[0, 2π)`).
    pub pulse_offset: f32,
}

/// Directed edge between neurons of adjacent layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub from: NeuronId,
    pub to: NeuronId,
}

/// Neurons and connections for one viewport size. Immutable once built.
#[derive(Debug, Clone)]
pub struct Topology {
    sizes: LayerSizes,
    width: f32,
    height: f32,
    neurons: Vec<Neuron>,
    connections: Vec<Connection>,
}

impl Topology {
    pub fn empty() -> Self {
        Self {
            sizes: LayerSizes::EMPTY,
            width: 0.0,
            height: 0.0,
            neurons: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Lay out `sizes` in a `width` x `height` viewport.
    ///
    /// An unmeasured viewport (non-positive or non-finite size) yields an empty
    /// topology.
    pub fn build<R: RandomSource>(
        sizes: LayerSizes,
        width: f32,
        height: f32,
        padding: f32,
        rng: &mut R,
    ) -> Self {
        let measured = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if !measured {
            return Self::empty();
        }

        // Keep input left of output on very narrow viewports.
        let padding = padding.max(0.0).min(width * 0.5);
        let x_for = |layer: Layer| match layer {
            Layer::Input => padding,
            Layer::Hidden => width * 0.5,
            Layer::Output => width - padding,
        };

        let mut neurons = Vec::with_capacity(sizes.total());
        for layer in Layer::ALL {
            let n = sizes.count(layer);
            let x = x_for(layer);
            for index in 0..n {
                let y = height * (index + 1) as f32 / (n + 1) as f32;
                neurons.push(Neuron {
                    position: Point::new(x, y),
                    layer,
                    index,
                    pulse_offset: rng.gen_range_f32(0.0, TAU),
                });
            }
        }

        let mut connections = Vec::with_capacity(sizes.connection_count());
        for (from_layer, to_layer) in [(Layer::Input, Layer::Hidden), (Layer::Hidden, Layer::Output)] {
            let from_base = sizes.offset(from_layer);
            let to_base = sizes.offset(to_layer);
            for a in 0..sizes.count(from_layer) {
                for b in 0..sizes.count(to_layer) {
                    connections.push(Connection {
                        from: from_base + a,
                        to: to_base + b,
                    });
                }
            }
        }

        Self {
            sizes,
            width,
            height,
            neurons,
            connections,
        }
    }

    /// Effective layer sizes (all zero for an empty topology).
    pub fn sizes(&self) -> LayerSizes {
        self.sizes
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.neurons.get(id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn layer_range(&self, layer: Layer) -> Range<NeuronId> {
        let start = self.sizes.offset(layer);
        start..start + self.sizes.count(layer)
    }

    pub fn layer_neurons(&self, layer: Layer) -> &[Neuron] {
        &self.neurons[self.layer_range(layer)]
    }

    pub fn neuron_id(&self, layer: Layer, index: usize) -> Option<NeuronId> {
        (index < self.sizes.count(layer)).then(|| self.sizes.offset(layer) + index)
    }

    /// Edge `input(i) -> hidden(h)`.
    pub fn input_hidden(&self, i: usize, h: usize) -> Option<ConnectionId> {
        (i < self.sizes.input && h < self.sizes.hidden).then(|| i * self.sizes.hidden + h)
    }

    /// Edge `hidden(h) -> output(o)`.
    pub fn hidden_output(&self, h: usize, o: usize) -> Option<ConnectionId> {
        (h < self.sizes.hidden && o < self.sizes.output)
            .then(|| self.sizes.input * self.sizes.hidden + h * self.sizes.output + o)
    }

    /// Nearest neuron whose center lies within `radius` of `p`.
    pub fn neuron_at(&self, p: Point, radius: f32) -> Option<NeuronId> {
        let r2 = radius * radius;
        self.neurons
            .iter()
            .enumerate()
            .map(|(id, n)| (id, n.position.distance_sq(p)))
            .filter(|&(_, d2)| d2 <= r2)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::empty()
    }
}
