//! Doors - barriers opened by a combination of pressure plates

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::plate::PressurePlate;
use crate::body::Collider;
use crate::events::{EventBus, GameEvent};

/// Slack for the open timer so float accumulation cannot skip a step
const TIMER_EPSILON: f32 = 1e-4;

/// How a door combines its plates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineMode {
    /// Every plate pressed
    #[default]
    All,
    /// At least one plate pressed
    Any,
}

impl CombineMode {
    /// Combine plate states. An empty set is never satisfied.
    pub fn combine(self, pressed: &[bool]) -> bool {
        if pressed.is_empty() {
            return false;
        }
        match self {
            CombineMode::All => pressed.iter().all(|p| *p),
            CombineMode::Any => pressed.iter().any(|p| *p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorPhase {
    /// Open state follows the condition
    Watching,
    /// Opened with a duration: the timer overrides the condition
    TimedOpen { remaining: f32 },
    /// Force-closed by the timer; waits for the condition to drop before re-arming
    AwaitingRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorTransition {
    Opened,
    Closed,
}

#[derive(Component, Debug, Clone)]
pub struct Door {
    pub id: String,
    pub plates: Vec<Entity>,
    pub mode: CombineMode,
    /// Seconds to stay open once opened; 0 sustains while the condition holds
    pub open_duration: f32,
    phase: DoorPhase,
    open: bool,
    warned: bool,
}

impl Door {
    pub fn new(
        id: impl Into<String>,
        plates: Vec<Entity>,
        mode: CombineMode,
        open_duration: f32,
    ) -> Self {
        Self {
            id: id.into(),
            plates,
            mode,
            open_duration,
            phase: DoorPhase::Watching,
            open: false,
            warned: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    /// Advance one step given the combined plate condition.
    ///
    /// Only reports a transition when the open state actually changes.
    pub fn evaluate(&mut self, condition: bool, dt: f32) -> Option<DoorTransition> {
        match self.phase {
            DoorPhase::Watching => {
                if condition && !self.open {
                    self.open = true;
                    if self.open_duration > 0.0 {
                        self.phase = DoorPhase::TimedOpen {
                            remaining: self.open_duration,
                        };
                    }
                    Some(DoorTransition::Opened)
                } else if !condition && self.open {
                    self.open = false;
                    Some(DoorTransition::Closed)
                } else {
                    None
                }
            }
            DoorPhase::TimedOpen { remaining } => {
                let remaining = remaining - dt;
                if remaining > TIMER_EPSILON {
                    self.phase = DoorPhase::TimedOpen { remaining };
                    return None;
                }
                self.open = false;
                self.phase = if condition {
                    DoorPhase::AwaitingRelease
                } else {
                    DoorPhase::Watching
                };
                Some(DoorTransition::Closed)
            }
            DoorPhase::AwaitingRelease => {
                if !condition {
                    self.phase = DoorPhase::Watching;
                }
                None
            }
        }
    }
}

/// Runs in FixedUpdate after plate occupancy: open or close doors on condition change
pub fn evaluate_doors(
    time: Res<Time>,
    plates: Query<&PressurePlate>,
    mut doors: Query<(&mut Door, &mut Collider, &mut Visibility)>,
    mut bus: ResMut<EventBus>,
) {
    let dt = time.delta_secs();
    for (mut door, mut collider, mut visibility) in &mut doors {
        if door.plates.is_empty() && !door.warned {
            warn!("Door '{}' has no plates configured and will never open", door.id);
            door.warned = true;
        }

        // A plate that no longer exists counts as unpressed
        let pressed: Vec<bool> = door
            .plates
            .iter()
            .map(|e| plates.get(*e).is_ok_and(|p| p.is_pressed()))
            .collect();
        let condition = door.mode.combine(&pressed);

        match door.evaluate(condition, dt) {
            Some(DoorTransition::Opened) => {
                collider.enabled = false;
                *visibility = Visibility::Hidden;
                info!("Door '{}' opened", door.id);
                bus.emit(GameEvent::DoorOpened {
                    door: door.id.clone(),
                });
            }
            Some(DoorTransition::Closed) => {
                collider.enabled = true;
                *visibility = Visibility::Inherited;
                info!("Door '{}' closed", door.id);
                bus.emit(GameEvent::DoorClosed {
                    door: door.id.clone(),
                });
            }
            None => {}
        }
    }
}
