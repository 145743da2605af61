//! Event logger - writes the bus to a per-session `.evlog` file

use bevy::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use uuid::Uuid;

use super::bus::EventBus;
use super::format::serialize_event;
use super::types::GameEvent;
use crate::tuning::GameplayTuning;

/// Configuration for event logging
#[derive(Resource, Clone)]
pub struct EventLogConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Whether logging is enabled
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            enabled: true,
        }
    }
}

/// Active event logger with file handle
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    session_id: String,
    config: EventLogConfig,
}

impl EventLogger {
    /// Create a new event logger (but don't open file yet)
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            writer: None,
            session_id: String::new(),
            config,
        }
    }

    /// Start a new log session: fresh UUID, new file, SessionStart + Config lines
    pub fn start_session(
        &mut self,
        timestamp: &str,
        tuning: &GameplayTuning,
    ) -> Result<PathBuf, String> {
        if !self.config.enabled {
            return Err("Event logging is disabled".to_string());
        }

        self.session_id = Uuid::new_v4().to_string();

        std::fs::create_dir_all(&self.config.log_dir).map_err(|e| {
            format!(
                "Failed to create log directory {}: {}",
                self.config.log_dir.display(),
                e
            )
        })?;

        let filename = format!("{}_{}.evlog", timestamp, &self.session_id[..8]);
        let path = self.config.log_dir.join(filename);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
        self.writer = Some(BufWriter::new(file));
        info!(
            "Event logging started: {} (session: {})",
            path.display(),
            &self.session_id[..8]
        );

        self.log(
            0,
            &GameEvent::SessionStart {
                session_id: self.session_id.clone(),
                timestamp: timestamp.to_string(),
            },
        );
        self.log(0, &GameEvent::Config(tuning.clone()));
        Ok(path)
    }

    /// Get the current session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// End the current log session
    pub fn end_session(&mut self) {
        if let Some(mut writer) = self.writer.take()
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    /// Log an event
    pub fn log(&mut self, time_ms: u32, event: &GameEvent) {
        let Some(writer) = &mut self.writer else {
            return;
        };
        if let Err(e) = writeln!(writer, "{}", serialize_event(time_ms, event)) {
            warn!("Failed to write event: {}", e);
        }
    }

    /// Check if logging is active
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(EventLogConfig::default())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        self.end_session();
    }
}

/// Runs in Last: drain the bus and write everything to the log, if one is open
pub fn flush_event_bus(mut bus: ResMut<EventBus>, logger: Option<ResMut<EventLogger>>) {
    if !bus.has_pending() {
        return;
    }
    let events = bus.drain();
    if let Some(mut logger) = logger {
        for e in &events {
            logger.log(e.time_ms, &e.event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("echostep_{}_{}", name, Uuid::new_v4()))
    }

    #[test]
    fn test_session_writes_header_lines() {
        let dir = temp_log_dir("header");
        let mut logger = EventLogger::new(EventLogConfig {
            log_dir: dir.clone(),
            enabled: true,
        });
        let path = logger
            .start_session("20260101_120000", &GameplayTuning::default())
            .unwrap();
        logger.log(1520, &GameEvent::RewindStarted);
        logger.end_session();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("T:00000|SE|"));
        assert!(lines[1].starts_with("T:00000|CF|{"));
        assert_eq!(lines[2], "T:01520|R+|");
        assert_eq!(logger.session_id().len(), 36);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_disabled_logger_opens_nothing() {
        let dir = temp_log_dir("disabled");
        let mut logger = EventLogger::new(EventLogConfig {
            log_dir: dir.clone(),
            enabled: false,
        });
        assert!(logger.start_session("x", &GameplayTuning::default()).is_err());
        assert!(!logger.is_active());
        assert!(!dir.exists());
    }
}
