//! Right-of-way at crossing zones, from one agent's point of view.
//!
//! Three situations, decided from the agent's position and travel direction:
//!
//! | Phase         | Condition                                   | Clear?                 | Speed × |
//! |---------------|---------------------------------------------|------------------------|---------|
//! | `Inside`      | current point inside a zone                 | yes                    | 0.6     |
//! | `Approaching` | look-ahead point inside, current point not  | after 1.5 s continuous | 0.5     |
//! | `Open`        | neither                                     | yes                    | 1.0     |
//!
//! The approach timer accumulates only in `Approaching` and is zeroed in the
//! other two phases.  (Numbers are the `CoordinationConfig` defaults.)

use fc_core::{CoordinationConfig, Vec2};
use fc_spatial::CrossingLayout;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CrossingPhase {
    Open,
    Approaching,
    Inside,
}

/// Result of one tick's crossing check.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossingAssessment {
    pub phase:        CrossingPhase,
    /// Zone being approached or occupied.
    pub zone:         Option<String>,
    /// `false` while the agent must keep waiting at the boundary.
    pub clear:        bool,
    /// Multiplier applied to the agent's base speed.
    pub speed_factor: f32,
}

/// Classify the agent's situation and advance its approach timer by `delta`.
pub fn assess_crossing(
    layout:         &CrossingLayout,
    pos:            Vec2,
    direction:      Vec2,
    approach_timer: &mut f32,
    delta:          f32,
    cfg:            &CoordinationConfig,
) -> CrossingAssessment {
    if let Some(zone) = layout.classify(pos) {
        *approach_timer = 0.0;
        return CrossingAssessment {
            phase:        CrossingPhase::Inside,
            zone:         Some(zone.id().to_owned()),
            clear:        true,
            speed_factor: cfg.crossing_inside_speed_factor,
        };
    }

    if let Some(zone) = layout.is_approaching(pos, direction, cfg.crossing_look_ahead) {
        *approach_timer += delta;
        return CrossingAssessment {
            phase:        CrossingPhase::Approaching,
            zone:         Some(zone.id().to_owned()),
            clear:        *approach_timer >= cfg.crossing_wait_secs,
            speed_factor: cfg.crossing_approach_speed_factor,
        };
    }

    *approach_timer = 0.0;
    CrossingAssessment {
        phase:        CrossingPhase::Open,
        zone:         None,
        clear:        true,
        speed_factor: 1.0,
    }
}
