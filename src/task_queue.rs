//! FIFO queue of pending delivery tasks.

use std::collections::VecDeque;

use crate::types::{Task, TaskId};

/// Pending tasks in arrival order plus the ids of tasks that completed.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
    completed: Vec<TaskId>,
}

impl TaskQueue {
    /// Create an empty task queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the back.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Remove the front task without blocking.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Mark an already dequeued task completed and record its id.
    pub fn mark_completed(&mut self, task: &mut Task) {
        task.mark_completed();
        self.completed.push(task.id);
    }

    /// Ids of tasks still waiting, front first.
    pub fn list_tasks(&self) -> Vec<TaskId> {
        self.queue.iter().map(|task| task.id).collect()
    }

    /// Ids of completed tasks in completion order.
    pub fn completed(&self) -> &[TaskId] {
        &self.completed
    }

    /// Current number of queued tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when no task is waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
