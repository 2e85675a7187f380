//! Shared identifiers and task model used across the system.

use std::fmt;

use rand::RngCore;
use serde::Serialize;
use uuid::Uuid;

/// Unique identifier for a delivery task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Fresh random identifier from the OS generator.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Draw a v4 identifier from a caller-supplied generator so seeded runs
    /// produce the same ids.
    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a delivery task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed,
}

/// One delivery request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Stable task identifier for history and status output.
    pub id: TaskId,
    /// What is being delivered.
    pub item: String,
    /// Pickup location label.
    pub from_location: String,
    /// Drop-off location label.
    pub to_location: String,
    status: TaskStatus,
}

impl Task {
    /// Construct a pending task with a fresh random id.
    pub fn create(
        item: impl Into<String>,
        from_location: impl Into<String>,
        to_location: impl Into<String>,
    ) -> Self {
        Self::with_id(TaskId::new_v4(), item, from_location, to_location)
    }

    /// Construct a pending task with an id allocated by the caller.
    pub fn with_id(
        id: TaskId,
        item: impl Into<String>,
        from_location: impl Into<String>,
        to_location: impl Into<String>,
    ) -> Self {
        Self {
            id,
            item: item.into(),
            from_location: from_location.into(),
            to_location: to_location.into(),
            status: TaskStatus::Pending,
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Set the terminal `Completed` status.
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
    }

    /// Set the terminal `Failed` status.
    pub fn mark_failed(&mut self) {
        self.status = TaskStatus::Failed;
    }
}
