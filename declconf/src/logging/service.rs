//! Logging service and sink implementations

use super::events::{LogEvent, LogLevel};
use std::env;
use std::sync::{Arc, Mutex};

/// Simple logger sink trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with a minimum-level filter
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified sink and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service from `DECLCONF_LOG_LEVEL` / `DECLCONF_LOG_FORMAT`
    pub fn from_env() -> Self {
        let min_level = min_level_from_env();
        let structured = env::var("DECLCONF_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let logger: Arc<dyn Logger> = if structured {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(ConsoleLogger)
        };

        Self::new(logger, min_level)
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event through the sink if it passes the level filter
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

fn min_level_from_env() -> LogLevel {
    match env::var("DECLCONF_LOG_LEVEL")
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "error" => LogLevel::Error,
        "warn" | "warning" => LogLevel::Warning,
        "debug" => LogLevel::Debug,
        _ => LogLevel::Info,
    }
}

/// Human-readable stderr sink
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", event.format_line());
    }
}

/// JSON-lines stderr sink
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", event.format_line()),
        }
    }
}

/// In-memory sink for tests
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().expect("memory logger poisoned").clone()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().expect("memory logger poisoned").clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        self.events
            .lock()
            .expect("memory logger poisoned")
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_level_filtering() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_event(LogEvent::debug("suppressed"));
        service.log_event(LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "kept"));

        let events = memory.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "kept");
    }

    #[test]
    fn test_memory_logger_clear() {
        let memory = MemoryLogger::new();
        memory.log(&LogEvent::info("one"));
        assert_eq!(memory.events().len(), 1);
        memory.clear();
        assert!(memory.events().is_empty());
    }
}
