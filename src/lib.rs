//! Classroom assistant robot: task queue, temperature sensor, interaction
//! log, and the controller state machine that ties them together.

pub mod config;
pub mod controller;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod sensor;
pub mod shell;
pub mod sim;
pub mod task_queue;
pub mod types;
