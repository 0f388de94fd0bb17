//! Undo/history sink.
//!
//! Mutating operations open one group per invocation and record each mutated
//! object exactly once, before its first change. Hosts map this onto their own
//! undo stack.

use serde::{Deserialize, Serialize};

pub trait UndoSink {
    /// Start a new undo group for one logical operation.
    fn begin_group(&mut self);
    /// Snapshot `object` before it is mutated.
    fn record(&mut self, object: &str, description: &str);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistory;

impl UndoSink for NoHistory {
    fn begin_group(&mut self) {}
    fn record(&mut self, _object: &str, _description: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub group: u32,
    pub object: String,
    pub description: String,
}

/// In-memory sink keeping every recorded entry; useful for hosts without an
/// undo stack and for asserting record-once behaviour.
#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    group: u32,
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of groups opened so far.
    pub fn groups(&self) -> u32 {
        self.group
    }

    /// Entries recorded in the most recent group.
    pub fn current_group(&self) -> impl Iterator<Item = &HistoryEntry> {
        let group = self.group;
        self.entries.iter().filter(move |e| e.group == group)
    }
}

impl UndoSink for HistoryLog {
    fn begin_group(&mut self) {
        self.group = self.group.wrapping_add(1);
    }

    fn record(&mut self, object: &str, description: &str) {
        self.entries.push(HistoryEntry {
            group: self.group,
            object: object.to_string(),
            description: description.to_string(),
        });
    }
}
