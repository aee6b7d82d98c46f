//! The position registry: one authoritative entry per entity.
//!
//! # Ownership model
//!
//! Every entry has exactly one writer, the entity's own controller (or, for
//! externally driven entities, the collaborator that placed it).  Writers
//! overwrite their whole entry each tick; the registry never merges fields
//! and never expires entries on its own.  A crashed writer therefore leaves
//! a stale entry behind until someone calls [`Registry::unregister`].
//!
//! # Query order
//!
//! Entries live in a `BTreeMap` keyed by [`EntityId`], so every query that
//! returns several entries returns them in ascending id order.  Callers may
//! rely on that order; it is identical on every platform and every run.
//!
//! Floors hold tens of agents, so all queries are plain O(n) scans.

use std::collections::BTreeMap;

use fc_core::{EntityId, EntityKind, Vec2};

/// Distance along the travel direction of the first `path_clear` sample.
pub const PATH_SAMPLE_START: f32 = 1.0;

/// Spacing between consecutive `path_clear` samples.
pub const PATH_SAMPLE_STEP: f32 = 0.5;

// ── EntityPosition ────────────────────────────────────────────────────────────

/// Where one entity is and what it intends to do this tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityPosition {
    pub id:   EntityId,
    pub pos:  Vec2,
    pub kind: EntityKind,

    /// Unit travel direction.  `None` while the entity is not travelling.
    pub direction: Option<Vec2>,

    /// The owner's raw (undebounced) "I am blocked" intent for this tick.
    /// `None` for entities that never report one (e.g. external workers).
    pub raw_blocked: Option<bool>,
}

impl EntityPosition {
    /// A bare position with no direction and no intent.
    pub fn new(id: impl Into<EntityId>, pos: Vec2, kind: EntityKind) -> Self {
        Self { id: id.into(), pos, kind, direction: None, raw_blocked: None }
    }

    pub fn with_direction(mut self, direction: Vec2) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_raw_blocked(mut self, blocked: bool) -> Self {
        self.raw_blocked = Some(blocked);
        self
    }

    /// `true` if the owner flagged itself as blocked this tick.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.raw_blocked == Some(true)
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Shared map from entity id to its current [`EntityPosition`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registry {
    entries: BTreeMap<EntityId, EntityPosition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry`, replacing any previous entry with the same id.
    pub fn register(&mut self, entry: EntityPosition) {
        self.entries.insert(entry.id.clone(), entry);
    }

    /// Remove the entry for `id`, returning it.  Absent ids are a no-op.
    pub fn unregister(&mut self, id: &str) -> Option<EntityPosition> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&EntityPosition> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityPosition> + '_ {
        self.entries.values()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Every entry of `kind` strictly closer than `radius` to `center`,
    /// skipping `exclude`.  Ascending id order.
    pub fn nearby(
        &self,
        center:  Vec2,
        radius:  f32,
        kind:    EntityKind,
        exclude: Option<&str>,
    ) -> Vec<&EntityPosition> {
        self.scan(center, radius, kind, exclude).collect()
    }

    /// `true` if [`nearby`](Self::nearby) would return anything.
    pub fn any_nearby(
        &self,
        center:  Vec2,
        radius:  f32,
        kind:    EntityKind,
        exclude: Option<&str>,
    ) -> bool {
        self.scan(center, radius, kind, exclude).next().is_some()
    }

    /// The closest entry of `kind` strictly within `max_distance` of
    /// `center`, skipping `exclude`.  Equal distances resolve to the lower id.
    pub fn nearest_of_type(
        &self,
        center:       Vec2,
        max_distance: f32,
        kind:         EntityKind,
        exclude:      Option<&str>,
    ) -> Option<&EntityPosition> {
        let mut best: Option<(&EntityPosition, f32)> = None;
        for e in self.scan(center, max_distance, kind, exclude) {
            let d = center.distance(e.pos);
            // Strict `<` keeps the first (lowest id) of equally distant entries.
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((e, d));
            }
        }
        best.map(|(e, _)| e)
    }

    /// Is the lane ahead of `origin` free?
    ///
    /// Samples points along the normalized `direction` at distances
    /// [`PATH_SAMPLE_START`], `+ PATH_SAMPLE_STEP`, … up to and including
    /// `check_distance`.  Returns `false` as soon as a sample has a worker
    /// strictly within `safety_radius`, or (only when `self_id` is given)
    /// any forklift other than `self_id` strictly within `safety_radius`.
    ///
    /// A zero `direction` produces no samples and the lane is clear, as does
    /// a `check_distance` that is NaN or infinite.
    pub fn path_clear(
        &self,
        origin:         Vec2,
        direction:      Vec2,
        check_distance: f32,
        safety_radius:  f32,
        self_id:        Option<&str>,
    ) -> bool {
        if !check_distance.is_finite() {
            return true;
        }
        let Some(dir) = direction.normalized() else {
            return true;
        };
        let mut i: u32 = 0;
        loop {
            // Multiply rather than accumulate so sample distances stay exact.
            let d = PATH_SAMPLE_START + PATH_SAMPLE_STEP * i as f32;
            if d > check_distance {
                return true;
            }
            let sample = origin + dir * d;
            if self.any_nearby(sample, safety_radius, EntityKind::Worker, None) {
                return false;
            }
            if let Some(me) = self_id {
                if self.any_nearby(sample, safety_radius, EntityKind::Forklift, Some(me)) {
                    return false;
                }
            }
            i += 1;
        }
    }

    fn scan<'a, 'b>(
        &'a self,
        center:  Vec2,
        radius:  f32,
        kind:    EntityKind,
        exclude: Option<&'b str>,
    ) -> impl Iterator<Item = &'a EntityPosition> + 'b
    where
        'a: 'b,
    {
        let r2 = radius * radius;
        self.entries.values().filter(move |e| {
            e.kind == kind
                && exclude != Some(e.id.as_str())
                && (e.pos - center).length_sq() < r2
        })
    }
}

// ── Approach test ─────────────────────────────────────────────────────────────

/// Is `candidate` actively heading towards `point`?
///
/// `true` only if the candidate is not flagged stopped, reports a direction,
/// and the normalized vector from the candidate to `point` has a dot product
/// with that direction strictly greater than `min_dot`.  A threshold above
/// zero keeps nearly perpendicular passes from flickering in and out.
pub fn is_approaching(point: Vec2, candidate: &EntityPosition, min_dot: f32) -> bool {
    if candidate.is_stopped() {
        return false;
    }
    let Some(dir) = candidate.direction else {
        return false;
    };
    let Some(to_point) = (point - candidate.pos).normalized() else {
        return false;
    };
    to_point.dot(dir) > min_dot
}
