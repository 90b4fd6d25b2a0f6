use std::collections::VecDeque;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Structured diagnostic record.
///
/// `kind` is a short dotted tag such as `load.failed` or `ar.unsupported`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub severity: Severity,
    pub kind: &'static str,
    pub message: String,
}

pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Diagnostic channel. Every event is mirrored to the `log` facade; the
/// most recent ones are kept for inspection.
#[derive(Debug)]
pub struct EventBus {
    events: VecDeque<Event>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn emit(
        &mut self,
        frame_index: u64,
        severity: Severity,
        kind: &'static str,
        message: impl Into<String>,
    ) {
        let message = message.into();
        match severity {
            Severity::Info => log::info!("[{kind}] {message}"),
            Severity::Warn => log::warn!("[{kind}] {message}"),
            Severity::Error => log::error!("[{kind}] {message}"),
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Event {
            frame_index,
            severity,
            kind,
            message,
        });
    }

    pub fn info(&mut self, frame_index: u64, kind: &'static str, message: impl Into<String>) {
        self.emit(frame_index, Severity::Info, kind, message);
    }

    pub fn warn(&mut self, frame_index: u64, kind: &'static str, message: impl Into<String>) {
        self.emit(frame_index, Severity::Warn, kind, message);
    }

    pub fn error(&mut self, frame_index: u64, kind: &'static str, message: impl Into<String>) {
        self.emit(frame_index, Severity::Error, kind, message);
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, Severity};

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        bus.info(2, "test", "hello");
        let events: Vec<_> = bus.events().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].frame_index, 2);
        assert_eq!(events[0].severity, Severity::Info);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.error(0, "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(bus.events().count(), 0);
    }

    #[test]
    fn oldest_events_are_dropped_at_capacity() {
        let mut bus = EventBus::with_capacity(2);
        bus.info(0, "a", "1");
        bus.info(1, "b", "2");
        bus.info(2, "c", "3");
        let kinds: Vec<_> = bus.events().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["b", "c"]);
        assert_eq!(bus.count_kind("a"), 0);
    }
}
