//! Robot controller: state machine, delivery execution, and status reporting.
//!
//! Every operation runs to completion on `&mut self`. `Completed` and `Error`
//! are transient: an operation that enters either always leaves it again
//! before returning, so callers only ever observe `Idle` between commands.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RobotConfig;
use crate::interaction::{Action, InteractionLog, LogEntry};
use crate::sensor::{AnomalyBounds, Sensor, TemperatureSensor};
use crate::task_queue::TaskQueue;
use crate::types::{Task, TaskId};

/// Identifier given to the controller's temperature sensor.
const SENSOR_ID: &str = "S1";

/// Controller lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RobotState {
    Idle,
    Executing,
    Completed,
    Error,
    Recovering,
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Executing => "Executing",
            Self::Completed => "Completed",
            Self::Error => "Error",
            Self::Recovering => "Recovering",
        };
        f.write_str(name)
    }
}

/// A single recorded state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub from: RobotState,
    pub to: RobotState,
}

/// Decides whether a delivery attempt succeeds.
pub trait OutcomeSource {
    fn delivery_succeeds(&mut self) -> bool;
}

/// Weighted coin: succeeds with `success_probability`.
pub struct WeightedOutcome<R = StdRng> {
    success_probability: f64,
    rng: R,
}

impl<R: Rng> WeightedOutcome<R> {
    /// Probabilities outside `[0, 1]` are clamped; a non-finite one never succeeds.
    pub fn new(success_probability: f64, rng: R) -> Self {
        let success_probability = if success_probability.is_finite() {
            success_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            success_probability,
            rng,
        }
    }
}

impl<R: Rng> OutcomeSource for WeightedOutcome<R> {
    fn delivery_succeeds(&mut self) -> bool {
        self.rng.random_bool(self.success_probability)
    }
}

/// User-visible event kept in the controller history.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "subject", rename_all = "snake_case")]
pub enum HistoryEvent {
    Deliver(TaskId),
    DeliverFailed(TaskId),
    Monitor(f64),
    Greet(String),
}

/// Result of executing a queued delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryResult {
    Delivered { item: String, to_location: String },
    Failed { task_id: TaskId, item: String },
    NoTasks,
}

impl fmt::Display for DeliveryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered { item, to_location } => write!(f, "Delivered {item} to {to_location}"),
            Self::Failed { task_id, .. } => write!(f, "Delivery {task_id} failed"),
            Self::NoTasks => f.write_str("No tasks."),
        }
    }
}

/// Outcome of one environment check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MonitorReport {
    pub temperature: f64,
    pub issue: bool,
}

/// Point-in-time copy of everything the controller exposes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub id: String,
    pub state: RobotState,
    pub history: Vec<HistoryEvent>,
    pub task_queue: Vec<TaskId>,
    pub interaction_log: Vec<LogEntry>,
    pub temperature_history: Vec<f64>,
}

/// Owns the task queue, sensor and interaction log and drives the state machine.
pub struct Controller {
    id: String,
    state: RobotState,
    tasks: TaskQueue,
    sensor: Box<dyn Sensor>,
    interaction: InteractionLog,
    history: Vec<HistoryEvent>,
    outcome: Box<dyn OutcomeSource>,
    task_ids: StdRng,
    bounds: AnomalyBounds,
    transitions: Vec<StateTransition>,
    messages: Vec<String>,
}

impl Controller {
    /// Build a controller whose randomness all derives from `config.seed`.
    pub fn from_config(config: &RobotConfig) -> Self {
        let mut seeds = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let sensor = TemperatureSensor::new(SENSOR_ID, config.baseline, StdRng::from_rng(&mut seeds));
        let outcome = WeightedOutcome::new(config.success_probability, StdRng::from_rng(&mut seeds));
        Self::with_parts(
            config.robot_id.clone(),
            Box::new(sensor),
            Box::new(outcome),
            seeds,
            config.bounds(),
        )
    }

    pub fn with_parts(
        id: impl Into<String>,
        sensor: Box<dyn Sensor>,
        outcome: Box<dyn OutcomeSource>,
        task_ids: StdRng,
        bounds: AnomalyBounds,
    ) -> Self {
        Self {
            id: id.into(),
            state: RobotState::Idle,
            tasks: TaskQueue::new(),
            sensor,
            interaction: InteractionLog::new(),
            history: Vec::new(),
            outcome,
            task_ids,
            bounds,
            transitions: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Replace the delivery outcome source, e.g. to force one branch.
    pub fn with_outcome(mut self, outcome: Box<dyn OutcomeSource>) -> Self {
        self.outcome = outcome;
        self
    }

    /// Robot identifier from the config.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current state; always `Idle` between operations.
    pub fn state(&self) -> RobotState {
        self.state
    }

    /// Every state change so far, oldest first.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Ids of deliveries that completed.
    pub fn completed_tasks(&self) -> &[TaskId] {
        self.tasks.completed()
    }

    pub fn interaction(&self) -> &InteractionLog {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionLog {
        &mut self.interaction
    }

    /// Take the display messages emitted since the last call.
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    fn change_state(&mut self, next: RobotState) {
        debug!(robot = %self.id, from = %self.state, to = %next, "state change");
        self.transitions.push(StateTransition {
            from: self.state,
            to: next,
        });
        self.state = next;
    }

    fn emit(&mut self, text: &str) {
        let message = self.interaction.display_message(text);
        info!(robot = %self.id, "{message}");
        self.messages.push(message);
    }

    /// Reset to `Idle` and announce readiness. Safe to call repeatedly.
    pub fn start(&mut self) {
        self.change_state(RobotState::Idle);
        self.emit("Robot ready.");
    }

    /// Queue a delivery and execute it immediately.
    pub fn deliver_material(&mut self, item: &str, from_location: &str, to_location: &str) -> DeliveryResult {
        let id = TaskId::from_rng(&mut self.task_ids);
        self.tasks
            .enqueue(Task::with_id(id, item, from_location, to_location));
        self.execute_next_task()
    }

    /// Dequeue the front task and run it to a terminal status.
    pub fn execute_next_task(&mut self) -> DeliveryResult {
        let Some(mut task) = self.tasks.dequeue() else {
            return DeliveryResult::NoTasks;
        };

        self.change_state(RobotState::Executing);
        self.emit(&format!("Executing delivery {} -> {}", task.item, task.to_location));

        if self.outcome.delivery_succeeds() {
            self.tasks.mark_completed(&mut task);
            self.history.push(HistoryEvent::Deliver(task.id));
            self.interaction
                .log(Action::Deliver, Some(task.to_location.clone()));
            self.change_state(RobotState::Completed);
            self.change_state(RobotState::Idle);
            DeliveryResult::Delivered {
                item: task.item,
                to_location: task.to_location,
            }
        } else {
            task.mark_failed();
            warn!(robot = %self.id, task = %task.id, item = %task.item, "delivery failed");
            self.history.push(HistoryEvent::DeliverFailed(task.id));
            self.interaction
                .log(Action::DeliverFailed, Some(task.to_location.clone()));
            self.change_state(RobotState::Error);
            self.recover_from_error();
            DeliveryResult::Failed {
                task_id: task.id,
                item: task.item,
            }
        }
    }

    /// Bounce back to `Idle`. The failed task is not retried.
    pub fn recover_from_error(&mut self) {
        debug!(robot = %self.id, "attempting recovery");
        self.change_state(RobotState::Recovering);
        self.change_state(RobotState::Idle);
    }

    /// Take one temperature reading; does not touch the state machine.
    pub fn monitor_environment(&mut self) -> MonitorReport {
        let temperature = self.sensor.read_data();
        let issue = self.sensor.detect_anomaly(self.bounds);
        self.history.push(HistoryEvent::Monitor(temperature));
        let action = if issue {
            Action::TemperatureAnomaly
        } else {
            Action::TemperatureOk
        };
        self.interaction
            .log(action, Some(format!("{temperature:.2}")));
        MonitorReport { temperature, issue }
    }

    /// Greet `name`, log it, and return the greeting text.
    pub fn greet_student(&mut self, name: &str) -> String {
        self.change_state(RobotState::Executing);
        let greeting = format!("Hello, {name}!");
        self.emit(&greeting);
        self.interaction.log(Action::Greet, Some(name.to_string()));
        self.history.push(HistoryEvent::Greet(name.to_string()));
        self.change_state(RobotState::Completed);
        self.change_state(RobotState::Idle);
        greeting
    }

    /// Copy of state, history, queued ids, log and sensor readings.
    pub fn get_status(&self) -> StatusSnapshot {
        StatusSnapshot {
            id: self.id.clone(),
            state: self.state,
            history: self.history.clone(),
            task_queue: self.tasks.list_tasks(),
            interaction_log: self.interaction.get_log(),
            temperature_history: self.sensor.history(),
        }
    }

    /// Undo the latest interaction log entry. Tasks, queue and sensor are untouched.
    pub fn undo_last_interaction(&mut self) -> Option<LogEntry> {
        self.interaction.undo_last()
    }
}
