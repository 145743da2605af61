//! Level database - TOML parsing and storage

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;

use crate::body::{BodyKind, KindFilter};
use crate::constants::*;
use crate::puzzle::CombineMode;

/// Solid platform, centered on (x, y)
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    #[serde(default = "default_platform_height")]
    pub height: f32,
}

/// Pressure plate lying on a surface whose top is at `y`
#[derive(Debug, Clone, Deserialize)]
pub struct PlateDef {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_plate_width")]
    pub width: f32,
    #[serde(default = "KindFilter::any_body")]
    pub authorized: KindFilter,
}

/// Door barrier, centered on (x, y)
#[derive(Debug, Clone, Deserialize)]
pub struct DoorDef {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_door_width")]
    pub width: f32,
    pub height: f32,
    /// Plate ids this door listens to
    #[serde(default)]
    pub plates: Vec<String>,
    #[serde(default)]
    pub mode: CombineMode,
    /// 0 = stay open while the condition holds
    #[serde(default)]
    pub open_duration: f32,
}

/// Hazard beam emitter at (x, y)
#[derive(Debug, Clone, Deserialize)]
pub struct BeamDef {
    pub x: f32,
    pub y: f32,
    pub direction: [f32; 2],
    #[serde(default = "default_beam_distance")]
    pub max_distance: f32,
    #[serde(default = "default_beam_blocking")]
    pub blocking: KindFilter,
    #[serde(default = "default_beam_damage")]
    pub damage: KindFilter,
}

/// Single level definition
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_spawn")]
    pub spawn: [f32; 2],
    #[serde(default, rename = "platform")]
    pub platforms: Vec<PlatformDef>,
    #[serde(default, rename = "plate")]
    pub plates: Vec<PlateDef>,
    #[serde(default, rename = "door")]
    pub doors: Vec<DoorDef>,
    #[serde(default, rename = "beam")]
    pub beams: Vec<BeamDef>,
}

impl LevelData {
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::from_array(self.spawn)
    }
}

fn default_platform_height() -> f32 {
    20.0
}

fn default_plate_width() -> f32 {
    60.0
}

fn default_door_width() -> f32 {
    24.0
}

fn default_beam_distance() -> f32 {
    DEFAULT_BEAM_DISTANCE
}

fn default_beam_blocking() -> KindFilter {
    KindFilter::only(BodyKind::Ghost)
}

fn default_beam_damage() -> KindFilter {
    KindFilter::only(BodyKind::Player)
}

fn default_spawn() -> [f32; 2] {
    DEFAULT_SPAWN.to_array()
}

#[derive(Deserialize)]
struct LevelFile {
    #[serde(default, rename = "level")]
    levels: Vec<LevelData>,
}

/// Database of all loaded levels
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelDatabase {
    pub levels: Vec<LevelData>,
}

impl LevelDatabase {
    /// Load levels from file, returns the built-in levels on error
    pub fn load_from_file(path: &str) -> Self {
        let result = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path, e))
            .and_then(|content| {
                Self::parse(&content).map_err(|e| format!("Failed to parse {}: {}", path, e))
            });
        match result {
            Ok(db) => {
                info!("Loaded {} levels from {}", db.len(), path);
                db
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default_levels()
            }
        }
    }

    /// Parse level data from TOML
    pub fn parse(content: &str) -> Result<Self, String> {
        let file: LevelFile = toml::from_str(content).map_err(|e| e.to_string())?;
        if file.levels.is_empty() {
            return Err("no [[level]] entries".to_string());
        }
        Ok(Self {
            levels: file.levels,
        })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LevelData> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn first(&self) -> Option<&LevelData> {
        self.levels.first()
    }

    /// Id of the level `step` places after `current`, wrapping around
    pub fn cycle(&self, current: &str, step: i32) -> Option<&str> {
        if self.levels.is_empty() {
            return None;
        }
        let len = self.levels.len() as i32;
        let index = self
            .levels
            .iter()
            .position(|l| l.id == current)
            .unwrap_or(0) as i32;
        let next = (index + step).rem_euclid(len) as usize;
        Some(&self.levels[next].id)
    }

    /// Built-in fallback: one plate, one door, one beam
    pub fn default_levels() -> Self {
        let floor = ARENA_FLOOR_Y + FLOOR_THICKNESS / 2.0;
        Self {
            levels: vec![LevelData {
                id: "echo".to_string(),
                name: "Echo".to_string(),
                spawn: default_spawn(),
                platforms: vec![PlatformDef {
                    x: -150.0,
                    y: floor + 140.0,
                    width: 220.0,
                    height: default_platform_height(),
                }],
                plates: vec![PlateDef {
                    id: "west".to_string(),
                    x: -350.0,
                    y: floor,
                    width: default_plate_width(),
                    authorized: KindFilter::any_body(),
                }],
                doors: vec![DoorDef {
                    id: "gate".to_string(),
                    x: 250.0,
                    y: floor + 100.0,
                    width: default_door_width(),
                    height: 200.0,
                    plates: vec!["west".to_string()],
                    mode: CombineMode::All,
                    open_duration: 0.0,
                }],
                beams: vec![BeamDef {
                    x: 600.0,
                    y: floor + 20.0,
                    direction: [-1.0, 0.0],
                    max_distance: 300.0,
                    blocking: default_beam_blocking(),
                    damage: default_beam_damage(),
                }],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_with_defaults() {
        let toml = r#"
[[level]]
id = "one"
spawn = [0.0, 10.0]

[[level.plate]]
id = "a"
x = 1.0
y = 2.0

[[level.door]]
id = "d"
x = 0.0
y = 0.0
height = 100.0
plates = ["a"]
mode = "any"
open_duration = 2.0

[[level.beam]]
x = 5.0
y = 5.0
direction = [1.0, 0.0]
"#;
        let db = LevelDatabase::parse(toml).unwrap();
        let level = db.get("one").unwrap();
        assert_eq!(level.spawn_point(), Vec2::new(0.0, 10.0));

        assert_eq!(level.plates[0].authorized, KindFilter::any_body());
        assert_eq!(level.plates[0].width, 60.0);

        assert_eq!(level.doors[0].mode, CombineMode::Any);
        assert_eq!(level.doors[0].open_duration, 2.0);

        let beam = &level.beams[0];
        assert_eq!(beam.blocking, KindFilter::only(BodyKind::Ghost));
        assert_eq!(beam.damage, KindFilter::only(BodyKind::Player));
        assert_eq!(beam.max_distance, DEFAULT_BEAM_DISTANCE);
    }

    #[test]
    fn test_parse_masks() {
        let toml = r#"
[[level]]
id = "masks"

[[level.plate]]
id = "ghost-only"
x = 0.0
y = 0.0
authorized = ["ghost"]

[[level.beam]]
x = 0.0
y = 0.0
direction = [0.0, -1.0]
blocking = []
damage = ["player", "ghost"]
"#;
        let db = LevelDatabase::parse(toml).unwrap();
        let level = db.first().unwrap();
        assert_eq!(level.plates[0].authorized, KindFilter::only(BodyKind::Ghost));
        assert!(level.beams[0].blocking.is_empty());
        assert!(level.beams[0].damage.matches(BodyKind::Ghost));
    }

    #[test]
    fn test_parse_rejects_empty_file() {
        assert!(LevelDatabase::parse("").is_err());
        assert!(LevelDatabase::parse("[[level]]\nname = \"no id\"").is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        let mut db = LevelDatabase::default_levels();
        let mut second = db.levels[0].clone();
        second.id = "two".to_string();
        db.levels.push(second);

        assert_eq!(db.cycle("echo", 1), Some("two"));
        assert_eq!(db.cycle("two", 1), Some("echo"));
        assert_eq!(db.cycle("echo", -1), Some("two"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let db = LevelDatabase::load_from_file("does/not/exist.toml");
        assert!(db.get("echo").is_some());
    }

    #[test]
    fn test_shipped_levels_parse() {
        let db = LevelDatabase::parse(include_str!("../../assets/levels.toml")).unwrap();
        assert!(!db.is_empty());
    }
}
