//! Trigger volumes - enter/exit overlap events for bodies

use bevy::prelude::*;

use crate::body::{Body, BodyKind};
use crate::helpers::aabb_overlap;

/// Axis-aligned trigger area centered on the entity's transform
#[derive(Component, Debug, Clone, Default)]
pub struct TriggerVolume {
    pub half_size: Vec2,
    /// Bodies overlapping as of the last step
    inside: Vec<(Entity, BodyKind)>,
}

impl TriggerVolume {
    pub fn new(size: Vec2) -> Self {
        Self {
            half_size: size / 2.0,
            inside: Vec::new(),
        }
    }

    pub fn occupants(&self) -> &[(Entity, BodyKind)] {
        &self.inside
    }

    /// Replace the overlap set, returning (entered, exited).
    ///
    /// A body missing from `current` counts as exited, including bodies that
    /// were despawned while overlapping.
    pub fn update_overlaps(
        &mut self,
        current: Vec<(Entity, BodyKind)>,
    ) -> (Vec<(Entity, BodyKind)>, Vec<(Entity, BodyKind)>) {
        let entered = current
            .iter()
            .filter(|(e, _)| !self.inside.iter().any(|(prev, _)| prev == e))
            .copied()
            .collect();
        let exited = self
            .inside
            .iter()
            .filter(|(prev, _)| !current.iter().any(|(e, _)| e == prev))
            .copied()
            .collect();
        self.inside = current;
        (entered, exited)
    }
}

/// Overlap change reported by the trigger layer
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum TriggerEvent {
    Enter {
        trigger: Entity,
        body: Entity,
        kind: BodyKind,
    },
    Exit {
        trigger: Entity,
        body: Entity,
        kind: BodyKind,
    },
}

/// Runs in FixedUpdate: diff body/trigger overlaps against the previous step
pub fn detect_trigger_overlaps(
    mut triggers: Query<(Entity, &Transform, &mut TriggerVolume)>,
    bodies: Query<(Entity, &Transform, &Body)>,
    mut events: MessageWriter<TriggerEvent>,
) {
    for (trigger, trigger_transform, mut volume) in &mut triggers {
        let center = trigger_transform.translation.truncate();
        let current: Vec<(Entity, BodyKind)> = bodies
            .iter()
            .filter(|(_, transform, body)| {
                aabb_overlap(
                    center,
                    volume.half_size,
                    transform.translation.truncate(),
                    body.half_size,
                )
            })
            .map(|(entity, _, body)| (entity, body.kind))
            .collect();

        let (entered, exited) = volume.update_overlaps(current);
        for (body, kind) in exited {
            events.write(TriggerEvent::Exit {
                trigger,
                body,
                kind,
            });
        }
        for (body, kind) in entered {
            events.write(TriggerEvent::Enter {
                trigger,
                body,
                kind,
            });
        }
    }
}
