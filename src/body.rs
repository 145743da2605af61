//! Physical bodies and what they are allowed to interact with
//!
//! Every moving participant carries a [`Body`] tagged with a [`BodyKind`].
//! Plates and beams decide who they react to with a [`KindFilter`] instead of
//! collision-layer bitmasks.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// What a body is, as far as puzzles are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Player,
    Ghost,
}

impl std::fmt::Display for BodyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyKind::Player => write!(f, "player"),
            BodyKind::Ghost => write!(f, "ghost"),
        }
    }
}

/// Set of body kinds a trigger or hazard reacts to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindFilter(pub Vec<BodyKind>);

impl KindFilter {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn only(kind: BodyKind) -> Self {
        Self(vec![kind])
    }

    pub fn of(kinds: &[BodyKind]) -> Self {
        Self(kinds.to_vec())
    }

    /// Player and ghost alike
    pub fn any_body() -> Self {
        Self::of(&[BodyKind::Player, BodyKind::Ghost])
    }

    pub fn matches(&self, kind: BodyKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An interactive body occupying space in the world
#[derive(Component, Debug, Clone, Copy)]
pub struct Body {
    pub kind: BodyKind,
    pub half_size: Vec2,
}

impl Body {
    pub fn new(kind: BodyKind, size: Vec2) -> Self {
        Self {
            kind,
            half_size: size / 2.0,
        }
    }
}

/// 2D velocity vector
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Velocity(pub Vec2);

/// Presentation interpolation requested by a body.
///
/// Stands in for the host engine's per-body interpolation setting; the rewind
/// controller switches it off while it places the body directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    None,
    #[default]
    Interpolate,
    Extrapolate,
}

/// Whether the physics step drives this body
///
/// The rewind controller turns simulation off while it owns the body's motion.
#[derive(Component, Debug, Clone, Copy)]
pub struct PhysicsControl {
    pub simulated: bool,
    pub interpolation: Interpolation,
}

impl Default for PhysicsControl {
    fn default() -> Self {
        Self {
            simulated: true,
            interpolation: Interpolation::default(),
        }
    }
}

/// Solid, axis-aligned blocker that simulated bodies collide with
#[derive(Component, Debug, Clone, Copy)]
pub struct Collider {
    pub half_size: Vec2,
    pub enabled: bool,
}

impl Collider {
    pub fn new(size: Vec2) -> Self {
        Self {
            half_size: size / 2.0,
            enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_filter_matches() {
        let filter = KindFilter::only(BodyKind::Ghost);
        assert!(filter.matches(BodyKind::Ghost));
        assert!(!filter.matches(BodyKind::Player));
        assert!(!KindFilter::none().matches(BodyKind::Player));
        assert!(KindFilter::any_body().matches(BodyKind::Player));
    }

    #[test]
    fn test_kind_filter_deserializes_from_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            kinds: KindFilter,
        }
        let w: Wrapper = toml::from_str(r#"kinds = ["player", "ghost"]"#).unwrap();
        assert_eq!(w.kinds, KindFilter::any_body());
    }
}
