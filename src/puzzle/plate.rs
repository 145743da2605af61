//! Pressure plates - pressed while an authorized body stands on them

use bevy::prelude::*;

use super::trigger::TriggerEvent;
use crate::body::{BodyKind, KindFilter};
use crate::constants::{PLATE_IDLE_COLOR, PLATE_PRESSED_COLOR};
use crate::events::{EventBus, GameEvent};

#[derive(Component, Debug, Clone)]
pub struct PressurePlate {
    pub id: String,
    pub authorized: KindFilter,
    occupancy: u32,
}

impl PressurePlate {
    pub fn new(id: impl Into<String>, authorized: KindFilter) -> Self {
        Self {
            id: id.into(),
            authorized,
            occupancy: 0,
        }
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn is_pressed(&self) -> bool {
        self.occupancy > 0
    }

    /// Count an entering body. Returns true if the plate became pressed.
    pub fn on_enter(&mut self, kind: BodyKind) -> bool {
        if !self.authorized.matches(kind) {
            return false;
        }
        let was_pressed = self.is_pressed();
        self.occupancy += 1;
        !was_pressed
    }

    /// Count a leaving body, never dropping below zero.
    /// Returns true if the plate became released.
    pub fn on_exit(&mut self, kind: BodyKind) -> bool {
        if !self.authorized.matches(kind) {
            return false;
        }
        let was_pressed = self.is_pressed();
        self.occupancy = self.occupancy.saturating_sub(1);
        was_pressed && !self.is_pressed()
    }
}

/// Runs in FixedUpdate after trigger detection
pub fn update_plate_occupancy(
    mut events: MessageReader<TriggerEvent>,
    mut plates: Query<(&mut PressurePlate, Option<&mut Sprite>)>,
    mut bus: ResMut<EventBus>,
) {
    for event in events.read() {
        let (trigger, entering, kind) = match *event {
            TriggerEvent::Enter { trigger, kind, .. } => (trigger, true, kind),
            TriggerEvent::Exit { trigger, kind, .. } => (trigger, false, kind),
        };
        let Ok((mut plate, sprite)) = plates.get_mut(trigger) else {
            continue;
        };

        let changed = if entering {
            plate.on_enter(kind)
        } else {
            plate.on_exit(kind)
        };
        if !changed {
            continue;
        }

        let pressed = plate.is_pressed();
        debug!("Plate '{}' {} by {}", plate.id, if pressed { "pressed" } else { "released" }, kind);
        bus.emit(if pressed {
            GameEvent::PlatePressed {
                plate: plate.id.clone(),
            }
        } else {
            GameEvent::PlateReleased {
                plate: plate.id.clone(),
            }
        });
        if let Some(mut sprite) = sprite {
            sprite.color = if pressed {
                PLATE_PRESSED_COLOR
            } else {
                PLATE_IDLE_COLOR
            };
        }
    }
}
