//! Compact text format for game event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = 1-2 char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:00000|LS|tutorial
//! T:01520|R+|
//! T:02380|R-|43
//! T:02380|G+|43
//! T:02900|P+|west
//! T:02900|D+|gate
//! ```

use super::types::GameEvent;
use crate::tuning::GameplayTuning;

/// Free-form text can't contain the field separator
fn sanitize(text: &str) -> String {
    text.replace('|', "/")
}

/// Serialize a GameEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &GameEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        GameEvent::SessionStart {
            session_id,
            timestamp,
        } => format!("{}|{}", session_id, timestamp),
        GameEvent::Config(tuning) => {
            // Compact JSON for easy parsing
            serde_json::to_string(tuning).unwrap_or_else(|_| "{}".to_string())
        }
        GameEvent::LevelStart { level_id } => sanitize(level_id),
        GameEvent::RewindStopped { undone } => undone.to_string(),
        GameEvent::RewindRejected { reason } => sanitize(reason),
        GameEvent::GhostSpawned { samples } => samples.to_string(),
        GameEvent::PlatePressed { plate } | GameEvent::PlateReleased { plate } => sanitize(plate),
        GameEvent::DoorOpened { door } | GameEvent::DoorClosed { door } => sanitize(door),
        GameEvent::Jump
        | GameEvent::Land
        | GameEvent::RewindStarted
        | GameEvent::GhostExpired
        | GameEvent::PlayerKilled
        | GameEvent::Respawned => String::new(),
    };

    format!("{}|{}|{}", ts, code, data)
}

/// Parse a line back into timestamp and event
pub fn parse_event(line: &str) -> Option<(u32, GameEvent)> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 3 {
        return None;
    }

    let ts_str = parts[0].strip_prefix("T:")?;
    let time_ms: u32 = ts_str.parse().ok()?;

    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "SE" if data.len() >= 2 => GameEvent::SessionStart {
            session_id: data[0].to_string(),
            timestamp: data[1].to_string(),
        },
        "CF" => {
            // Rejoin in case the JSON contained |
            let json_str = data.join("|");
            let tuning: GameplayTuning = serde_json::from_str(&json_str).ok()?;
            GameEvent::Config(tuning)
        }
        "LS" => GameEvent::LevelStart {
            level_id: data[0].to_string(),
        },
        "J" => GameEvent::Jump,
        "LD" => GameEvent::Land,
        "R+" => GameEvent::RewindStarted,
        "R-" => GameEvent::RewindStopped {
            undone: data[0].parse().ok()?,
        },
        "RX" => GameEvent::RewindRejected {
            reason: data[0].to_string(),
        },
        "G+" => GameEvent::GhostSpawned {
            samples: data[0].parse().ok()?,
        },
        "G-" => GameEvent::GhostExpired,
        "P+" => GameEvent::PlatePressed {
            plate: data[0].to_string(),
        },
        "P-" => GameEvent::PlateReleased {
            plate: data[0].to_string(),
        },
        "D+" => GameEvent::DoorOpened {
            door: data[0].to_string(),
        },
        "D-" => GameEvent::DoorClosed {
            door: data[0].to_string(),
        },
        "K" => GameEvent::PlayerKilled,
        "RS" => GameEvent::Respawned,
        _ => return None,
    };

    Some((time_ms, event))
}
