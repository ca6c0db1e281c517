//! Event tracing for debugging tabhost.
//!
//! Provides a ring buffer of recent controller events. The replay command
//! prints it so a scenario's full history can be inspected.

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::state::StateTransition;

/// Maximum number of events to keep in the trace buffer
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// One traced event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub sequence: u64,
    pub timestamp_ms: u64,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    pub details: String,
}

/// Event tracer with ring buffer storage
pub struct EventTracer {
    entries: VecDeque<EventLogEntry>,
    max_entries: usize,
    sequence: u64,
    start_time: Instant,
}

impl EventTracer {
    /// Create a new event tracer with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a new event tracer with specified capacity
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
            sequence: 0,
            start_time: Instant::now(),
        }
    }

    /// Get the current timestamp in milliseconds since tracer start
    fn timestamp(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Trace a raw host event (focus change, key press, tab click)
    pub fn trace_host_event(&mut self, event_type: &str, page: Option<&str>, details: &str) {
        self.add_entry(event_type.to_string(), page.map(str::to_string), details.to_string());
    }

    /// Trace a state transition
    pub fn trace_transition(&mut self, transition: &StateTransition) {
        let (event_type, page, details) = match transition {
            StateTransition::PageAttached { name, window } => {
                ("page_attached", Some(name.clone()), format!("window=0x{:x}", window))
            }
            StateTransition::PageReactivated { name } => {
                ("page_reactivated", Some(name.clone()), String::new())
            }
            StateTransition::TabSwitched { from, to } => {
                ("tab_switched", Some(to.clone()), format!("from={:?}", from))
            }
            StateTransition::TitleChanged { name, title } => {
                ("title_changed", Some(name.clone()), format!("title={:?}", title))
            }
            StateTransition::CloseRequested { name } => {
                ("close_requested", Some(name.clone()), String::new())
            }
            StateTransition::CloseRefused { name } => {
                ("close_refused", Some(name.clone()), String::new())
            }
            StateTransition::PageRemoved { name } => {
                ("page_removed", Some(name.clone()), String::new())
            }
            StateTransition::ContainerCloseRedirected => {
                ("container_close_redirected", None, String::new())
            }
        };
        self.add_entry(event_type.to_string(), page, details);
    }

    /// Add an entry to the trace buffer
    fn add_entry(&mut self, event_type: String, page: Option<String>, details: String) {
        if self.max_entries == 0 {
            return;
        }
        // Remove oldest entry if at capacity
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }

        self.sequence += 1;
        self.entries.push_back(EventLogEntry {
            sequence: self.sequence,
            timestamp_ms: self.timestamp(),
            event_type,
            page,
            details,
        });
    }

    /// Get the last N entries
    pub fn get_last(&self, n: usize) -> Vec<EventLogEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(start).cloned().collect()
    }

    /// Get all entries
    pub fn get_all(&self) -> Vec<EventLogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Clear the trace buffer
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sequence = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventTracer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_host_event() {
        let mut tracer = EventTracer::new();
        tracer.trace_host_event("focus_changed", Some("Browser"), "from main");

        let entries = tracer.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_type, "focus_changed");
        assert_eq!(entries[0].page.as_deref(), Some("Browser"));
    }

    #[test]
    fn test_trace_transition() {
        let mut tracer = EventTracer::new();
        tracer.trace_transition(&StateTransition::PageAttached {
            name: "AddCards".to_string(),
            window: 0x2a,
        });
        let entries = tracer.get_all();
        assert_eq!(entries[0].event_type, "page_attached");
        assert_eq!(entries[0].details, "window=0x2a");
    }

    #[test]
    fn test_ring_buffer_overflow() {
        let mut tracer = EventTracer::with_capacity(3);

        tracer.trace_host_event("event1", None, "");
        tracer.trace_host_event("event2", None, "");
        tracer.trace_host_event("event3", None, "");
        tracer.trace_host_event("event4", None, "");

        let entries = tracer.get_all();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].event_type, "event2");
        assert_eq!(entries[2].event_type, "event4");
        assert_eq!(entries[2].sequence, 4);
    }

    #[test]
    fn test_get_last() {
        let mut tracer = EventTracer::new();

        for i in 0..10 {
            tracer.trace_host_event(&format!("event{}", i), None, "");
        }

        let last_3 = tracer.get_last(3);
        assert_eq!(last_3.len(), 3);
        assert_eq!(last_3[0].event_type, "event7");
        assert_eq!(last_3[2].event_type, "event9");
        assert_eq!(tracer.get_last(50).len(), 10);

        tracer.clear();
        assert!(tracer.is_empty());
    }
}
