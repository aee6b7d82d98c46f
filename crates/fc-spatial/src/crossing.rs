//! Crossing zones: rectangular floor areas where agents yield before entry.
//!
//! # Data layout
//!
//! Zones are static for the lifetime of a floor.  [`CrossingLayout`] keeps
//! them in declaration order (the order that breaks ties between
//! overlapping zones) plus an R-tree over their envelopes for point
//! location.  A point query collects every envelope containing the point and
//! keeps the one declared first.
//!
//! Bounds are inclusive on all four sides.

use std::collections::HashSet;

use rstar::{AABB, Envelope, PointDistance, RTree, RTreeObject};
use tracing::debug;

use fc_core::Vec2;

use crate::{SpatialError, SpatialResult};

// ── CrossingZone ──────────────────────────────────────────────────────────────

/// What a zone guards.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ZoneKind {
    /// A walkway or lane crossing a conveyor line.
    Conveyor,
    /// An aisle intersection.
    Intersection,
}

impl ZoneKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneKind::Conveyor     => "conveyor",
            ZoneKind::Intersection => "intersection",
        }
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable axis-aligned rectangle on the floor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingZone {
    id:    String,
    x_min: f32,
    x_max: f32,
    z_min: f32,
    z_max: f32,
    kind:  ZoneKind,
}

impl CrossingZone {
    /// Build a zone, rejecting non-finite or inverted bounds.
    pub fn new(
        id:    impl Into<String>,
        x_min: f32,
        x_max: f32,
        z_min: f32,
        z_max: f32,
        kind:  ZoneKind,
    ) -> SpatialResult<Self> {
        let id = id.into();
        let finite = [x_min, x_max, z_min, z_max].iter().all(|v| v.is_finite());
        if !finite || x_min > x_max || z_min > z_max {
            return Err(SpatialError::InvalidZoneBounds { id, x_min, x_max, z_min, z_max });
        }
        Ok(Self { id, x_min, x_max, z_min, z_max, kind })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    /// `(x_min, x_max, z_min, z_max)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        (self.x_min, self.x_max, self.z_min, self.z_max)
    }

    /// Inclusive point-in-rectangle test.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.z >= self.z_min && p.z <= self.z_max
    }

    fn envelope(&self) -> AABB<[f32; 2]> {
        AABB::from_corners([self.x_min, self.z_min], [self.x_max, self.z_max])
    }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a zone envelope plus its declaration index.
#[derive(Clone)]
struct ZoneEntry {
    envelope: AABB<[f32; 2]>,
    order:    usize,
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for ZoneEntry {
    /// Squared distance from the rectangle; zero anywhere inside it.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        Envelope::distance_2(&self.envelope, point)
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        Envelope::contains_point(&self.envelope, point)
    }
}

// ── CrossingLayout ────────────────────────────────────────────────────────────

/// The static zone set of one floor, with point classification.
#[derive(Clone)]
pub struct CrossingLayout {
    zones: Vec<CrossingZone>,
    index: RTree<ZoneEntry>,
}

impl CrossingLayout {
    /// Index `zones`.  Declaration order is preserved and decides which zone
    /// wins where two overlap.
    pub fn new(zones: Vec<CrossingZone>) -> SpatialResult<Self> {
        let mut seen = HashSet::with_capacity(zones.len());
        for z in &zones {
            if !seen.insert(z.id.as_str()) {
                return Err(SpatialError::DuplicateZone(z.id.clone()));
            }
        }

        let entries: Vec<ZoneEntry> = zones
            .iter()
            .enumerate()
            .map(|(order, z)| ZoneEntry { envelope: z.envelope(), order })
            .collect();
        let index = RTree::bulk_load(entries);
        debug!(zones = zones.len(), "crossing layout indexed");

        Ok(Self { zones, index })
    }

    /// A layout with no zones: nothing ever needs to yield.
    pub fn empty() -> Self {
        Self { zones: Vec::new(), index: RTree::new() }
    }

    pub fn zones(&self) -> &[CrossingZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CrossingZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// The zone containing `p`, if any.  First declared zone wins.
    pub fn classify(&self, p: Vec2) -> Option<&CrossingZone> {
        self.index
            .locate_all_at_point(&[p.x, p.z])
            .map(|e| e.order)
            .min()
            .map(|i| &self.zones[i])
    }

    /// The zone containing the point `look_ahead` units ahead of `p` along
    /// the normalized `direction`.  A zero direction classifies `p` itself.
    pub fn is_approaching(&self, p: Vec2, direction: Vec2, look_ahead: f32) -> Option<&CrossingZone> {
        let ahead = match direction.normalized() {
            Some(dir) => p + dir * look_ahead,
            None      => p,
        };
        self.classify(ahead)
    }
}

impl Default for CrossingLayout {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for CrossingLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossingLayout").field("zones", &self.zones).finish()
    }
}
