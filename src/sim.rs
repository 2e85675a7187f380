//! Scripted demo run for the classroom robot.

use std::io::Write;

use anyhow::Context;
use tracing::info;

use crate::controller::{Controller, HistoryEvent};

const DEMO_STUDENTS: [&str; 2] = ["Ana", "Ben"];
const DEMO_DELIVERIES: [(&str, &str, &str); 2] = [
    ("book", "teacher", "student"),
    ("markers", "supply room", "room 12"),
];
const DEMO_READINGS: usize = 3;

/// Drive one fixed command sequence and print a summary (plus the full
/// status snapshot as JSON when `json` is set).
pub fn run_demo<W: Write>(controller: &mut Controller, out: &mut W, json: bool) -> anyhow::Result<()> {
    info!(robot = %controller.id(), "demo start");
    controller.start();
    for name in DEMO_STUDENTS {
        controller.greet_student(name);
    }
    for (item, from, to) in DEMO_DELIVERIES {
        let result = controller.deliver_material(item, from, to);
        info!(%result, "demo delivery");
    }
    for _ in 0..DEMO_READINGS {
        controller.monitor_environment();
    }
    let undone = controller.undo_last_interaction();
    info!(?undone, "demo undo");

    for message in controller.drain_messages() {
        writeln!(out, "{message}")?;
    }

    let status = controller.get_status();
    let failed = status
        .history
        .iter()
        .filter(|event| matches!(event, HistoryEvent::DeliverFailed(_)))
        .count();

    writeln!(out, "DEMO SUMMARY")?;
    writeln!(out, "robot={}", status.id)?;
    writeln!(out, "state={}", status.state)?;
    writeln!(out, "deliveries_completed={}", controller.completed_tasks().len())?;
    writeln!(out, "deliveries_failed={failed}")?;
    writeln!(out, "history_len={}", status.history.len())?;
    writeln!(out, "log_len={}", status.interaction_log.len())?;
    writeln!(out, "queued={}", status.task_queue.len())?;
    writeln!(out, "readings={}", status.temperature_history.len())?;
    if json {
        let rendered = serde_json::to_string_pretty(&status).context("serialize status snapshot")?;
        writeln!(out, "{rendered}")?;
    }
    Ok(())
}
