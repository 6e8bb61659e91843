//! Traveling pulses and their per-tick advancement.

use crate::phase::Phase;
use crate::topology::{ConnectionId, Point, Topology};

pub type SignalId = u64;

/// Cosmetic attributes fixed at spawn time. No simulation semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalStyle {
    /// CSS hex color.
    pub color: &'static str,
    pub size: f32,
    pub trail: bool,
}

/// A pulse walking a multi-hop path of connections.
///
/// While live: `progress` is in `[0, 1)` and `path_index < path.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub id: SignalId,
    /// Phase that spawned the signal. `Backward` signals traverse every
    /// connection from its `to` end to its `from` end.
    pub direction: Phase,
    pub style: SignalStyle,
    path: Vec<ConnectionId>,
    path_index: usize,
    progress: f32,
}

impl Signal {
    /// Returns `None` for an empty path.
    pub fn new(
        id: SignalId,
        path: Vec<ConnectionId>,
        direction: Phase,
        style: SignalStyle,
    ) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self {
            id,
            direction,
            style,
            path,
            path_index: 0,
            progress: 0.0,
        })
    }

    pub fn path(&self) -> &[ConnectionId] {
        &self.path
    }

    pub fn path_index(&self) -> usize {
        self.path_index
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn current_connection(&self) -> ConnectionId {
        self.path[self.path_index]
    }

    pub fn on_last_segment(&self) -> bool {
        self.path_index + 1 == self.path.len()
    }

    /// Start and end of the current segment in traversal order.
    pub fn segment(&self, topology: &Topology) -> Option<(Point, Point)> {
        let conn = topology.connection(self.current_connection())?;
        let from = topology.neuron(conn.from)?.position;
        let to = topology.neuron(conn.to)?.position;
        Some(match self.direction {
            Phase::Forward => (from, to),
            Phase::Backward => (to, from),
        })
    }

    /// Interpolated position along the current segment.
    pub fn position(&self, topology: &Topology) -> Option<Point> {
        let (start, end) = self.segment(topology)?;
        Some(start.lerp(end, self.progress))
    }

    /// Apply `step` of progress. Returns `false` once the path is exhausted.
    fn advance(&mut self, step: f32) -> bool {
        let next = self.progress + step;
        if next < 1.0 {
            self.progress = next;
            return true;
        }
        if self.path_index + 1 < self.path.len() {
            self.path_index += 1;
            self.progress = 0.0;
            return true;
        }
        false
    }
}

/// Owns the live signal set.
#[derive(Debug, Clone)]
pub struct SignalTracker {
    signals: Vec<Signal>,
    travel_s: f32,
}

impl SignalTracker {
    /// `travel_s` is the time to cross one connection.
    pub fn new(travel_s: f32) -> Self {
        Self {
            signals: Vec::new(),
            travel_s,
        }
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Drop every live signal, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.signals.len();
        self.signals = Vec::new();
        n
    }

    /// Swap in a freshly spawned wave. Returns how many old signals were discarded.
    pub fn replace(&mut self, wave: Vec<Signal>) -> usize {
        let discarded = self.signals.len();
        self.signals = wave;
        discarded
    }

    /// Advance every live signal by `dt` seconds.
    ///
    /// A signal finishing a segment moves to the next one with zero progress; a
    /// signal finishing its last segment is removed. Returns the number removed.
    /// Non-positive or non-finite `dt` is ignored.
    pub fn advance(&mut self, dt: f32) -> usize {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        let step = dt / self.travel_s;
        let before = self.signals.len();
        self.signals.retain_mut(|s| s.advance(step));
        before - self.signals.len()
    }
}
