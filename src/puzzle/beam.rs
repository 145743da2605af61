//! Hazard beams - first-hit-wins line of effect
//!
//! A beam walks its hits nearest first. The first body that is either a
//! blocker or a target decides the outcome; anything else is passed through.

use bevy::prelude::*;

use crate::body::{Body, BodyKind, KindFilter};
use crate::constants::DEFAULT_BEAM_DISTANCE;
use crate::helpers::ray_aabb_distance;
use crate::player::KillRequest;

#[derive(Component, Debug, Clone)]
pub struct HazardBeam {
    /// Need not be normalized; zero disables the beam
    pub direction: Vec2,
    pub max_distance: f32,
    /// Kinds that absorb the beam
    pub blocking: KindFilter,
    /// Kinds the beam kills
    pub damage: KindFilter,
    /// Drawn length after the last cast
    pub visible_length: f32,
    warned: bool,
}

impl Default for HazardBeam {
    fn default() -> Self {
        Self::new(Vec2::X, DEFAULT_BEAM_DISTANCE)
    }
}

/// One body crossing the beam
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamHit {
    pub entity: Entity,
    pub kind: BodyKind,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeamOutcome {
    /// Degenerate direction: no effect this step
    Disabled,
    /// Nothing relevant within range
    Clear,
    /// Absorbed before reaching any target
    Blocked { by: Entity, distance: f32 },
    /// Target killed
    Hit { target: Entity, distance: f32 },
}

impl HazardBeam {
    /// Ghosts block, players die
    pub fn new(direction: Vec2, max_distance: f32) -> Self {
        Self {
            direction,
            max_distance,
            blocking: KindFilter::only(BodyKind::Ghost),
            damage: KindFilter::only(BodyKind::Player),
            visible_length: max_distance,
            warned: false,
        }
    }

    pub fn with_masks(mut self, blocking: KindFilter, damage: KindFilter) -> Self {
        self.blocking = blocking;
        self.damage = damage;
        self
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction.length_squared() < 1e-8
    }

    /// Intersect the beam with bodies, nearest first
    pub fn cast<'a>(
        &self,
        origin: Vec2,
        bodies: impl IntoIterator<Item = (Entity, Vec2, &'a Body)>,
    ) -> Vec<BeamHit> {
        if self.is_degenerate() {
            return Vec::new();
        }
        let direction = self.direction.normalize();
        let mut hits: Vec<BeamHit> = bodies
            .into_iter()
            .filter_map(|(entity, center, body)| {
                ray_aabb_distance(origin, direction, self.max_distance, center, body.half_size)
                    .map(|distance| BeamHit {
                        entity,
                        kind: body.kind,
                        distance,
                    })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Decide what a set of hits does. Hits need not be pre-sorted.
    pub fn resolve(&self, mut hits: Vec<BeamHit>) -> BeamOutcome {
        if self.is_degenerate() {
            return BeamOutcome::Disabled;
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        for hit in hits.iter().filter(|h| h.distance <= self.max_distance) {
            // Blocking wins when a body is in both filters
            if self.blocking.matches(hit.kind) {
                return BeamOutcome::Blocked {
                    by: hit.entity,
                    distance: hit.distance,
                };
            }
            if self.damage.matches(hit.kind) {
                return BeamOutcome::Hit {
                    target: hit.entity,
                    distance: hit.distance,
                };
            }
        }
        BeamOutcome::Clear
    }
}

/// Runs in FixedUpdate after doors: cast every beam and request kills
pub fn fire_hazard_beams(
    mut beams: Query<(&Transform, &mut HazardBeam)>,
    bodies: Query<(Entity, &Transform, &Body)>,
    mut kills: MessageWriter<KillRequest>,
) {
    for (beam_transform, mut beam) in &mut beams {
        if beam.is_degenerate() {
            if !beam.warned {
                warn!("Hazard beam has a zero direction and is disabled");
                beam.warned = true;
            }
            beam.visible_length = 0.0;
            continue;
        }

        let origin = beam_transform.translation.truncate();
        let hits = beam.cast(
            origin,
            bodies
                .iter()
                .map(|(e, t, b)| (e, t.translation.truncate(), b)),
        );

        match beam.resolve(hits) {
            BeamOutcome::Hit { target, distance } => {
                debug!("Beam hit {:?} at {:.1}", target, distance);
                beam.visible_length = distance;
                kills.write(KillRequest { target });
            }
            BeamOutcome::Blocked { distance, .. } => beam.visible_length = distance,
            BeamOutcome::Clear => beam.visible_length = beam.max_distance,
            BeamOutcome::Disabled => beam.visible_length = 0.0,
        }
    }
}
