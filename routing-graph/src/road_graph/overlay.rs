//! Transient fake-edge overlay (§3, design note in §9).
//!
//! Two separate maps, ingoing and outgoing, from Junction to edge list.
//! Junctions compare by point under epsilon, but the overlay is keyed on the
//! exact bit pattern of the point's coordinates rather than the
//! epsilon-equivalence class: a lookup by a different-but-near point misses.
//! Callers that need vicinity lookup go through
//! [`crate::road_graph::RoadGraph::find_closest_edges`] instead.

use std::collections::HashMap;

use crate::edge::Edge;
use crate::geometry::{Junction, Point};

/// Exact-bit-pattern key for a [`Point`], used only by the overlay. Ignores
/// altitude, matching [`Junction`]'s own equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ExactPointKey(u64, u64);

impl ExactPointKey {
    fn new(point: Point) -> Self {
        Self(point.x.to_bits(), point.y.to_bits())
    }
}

/// Per-request fake-edge state (§5: "not shared", each routing request gets
/// its own overlay).
#[derive(Debug, Default)]
pub struct FakeEdgeOverlay {
    outgoing: HashMap<ExactPointKey, Vec<Edge>>,
    ingoing: HashMap<ExactPointKey, Vec<Edge>>,
    /// Speed a `part_of_real` edge inherits from the real edge it was split
    /// from (§4.2). A side list rather than a third directional map: only a
    /// handful of fake edges carry provenance per request, so a linear scan
    /// keyed on `Edge`'s own equality is cheaper than giving every edge a
    /// `Hash` impl just for this.
    inherited_speeds: Vec<(Edge, f64)>,
}

impl FakeEdgeOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn outgoing(&self, junction: &Junction) -> &[Edge] {
        self.outgoing.get(&ExactPointKey::new(junction.point)).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn ingoing(&self, junction: &Junction) -> &[Edge] {
        self.ingoing.get(&ExactPointKey::new(junction.point)).map_or(&[], Vec::as_slice)
    }

    pub fn push_outgoing(&mut self, junction: &Junction, edge: Edge) {
        self.outgoing.entry(ExactPointKey::new(junction.point)).or_default().push(edge);
    }

    pub fn push_ingoing(&mut self, junction: &Junction, edge: Edge) {
        self.ingoing.entry(ExactPointKey::new(junction.point)).or_default().push(edge);
    }

    /// Records the speed `edge` (a `part_of_real` fake edge) inherits from
    /// the real edge it was split from.
    pub fn record_inherited_speed(&mut self, edge: Edge, speed_kmph: f64) {
        self.inherited_speeds.push((edge, speed_kmph));
    }

    /// The speed previously recorded for `edge` via
    /// [`FakeEdgeOverlay::record_inherited_speed`], if any.
    #[must_use]
    pub fn inherited_speed_kmph(&self, edge: &Edge) -> Option<f64> {
        self.inherited_speeds.iter().find(|(recorded, _)| recorded == edge).map(|(_, speed)| *speed)
    }

    /// Empties both maps and the inherited-speed list in one operation
    /// (§3, §4.2 `reset_fakes`).
    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.ingoing.clear();
        self.inherited_speeds.clear();
    }
}
