//! Interaction log with single-level undo.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

/// Prefix placed in front of every message the robot shows.
const ROBOT_MARKER: &str = "[Robot]";

/// Kinds of actions recorded in the interaction log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Deliver,
    DeliverFailed,
    TemperatureOk,
    TemperatureAnomaly,
    Greet,
    Undo,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deliver => "deliver",
            Self::DeliverFailed => "deliver_failed",
            Self::TemperatureOk => "temperature_ok",
            Self::TemperatureAnomaly => "temperature_anomaly",
            Self::Greet => "greet",
            Self::Undo => "undo",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(action, actor)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub action: Action,
    pub actor: Option<String>,
}

impl LogEntry {
    pub fn new(action: Action, actor: Option<String>) -> Self {
        Self { action, actor }
    }
}

/// Append-only interaction log plus the stack of entries that can still be undone.
#[derive(Debug, Default)]
pub struct InteractionLog {
    entries: Vec<LogEntry>,
    undo_stack: Vec<LogEntry>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action in both the log and the undo stack.
    pub fn log(&mut self, action: Action, actor: Option<String>) {
        debug!(%action, actor = actor.as_deref().unwrap_or(""), "interaction logged");
        let entry = LogEntry::new(action, actor);
        self.undo_stack.push(entry.clone());
        self.entries.push(entry);
    }

    /// Pop the most recent undoable entry.
    ///
    /// The log entry itself stays; an `undo` marker carrying the same actor is
    /// appended instead. The marker is not undoable. Returns `None` without
    /// touching anything when there is nothing left to undo.
    pub fn undo_last(&mut self) -> Option<LogEntry> {
        let entry = self.undo_stack.pop()?;
        self.entries
            .push(LogEntry::new(Action::Undo, entry.actor.clone()));
        info!(action = %entry.action, "interaction undone");
        Some(entry)
    }

    /// Copy of the full log, oldest first.
    pub fn get_log(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    /// Number of entries that can still be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Format a message as spoken by the robot.
    pub fn display_message(&self, text: &str) -> String {
        format!("{ROBOT_MARKER} {text}")
    }
}
