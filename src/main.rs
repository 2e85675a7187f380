use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use classroom_robot::config::RobotConfig;
use classroom_robot::controller::Controller;
use classroom_robot::shell::Shell;
use classroom_robot::{logging, sim};

#[derive(Parser, Debug)]
#[command(name = "classroom_robot", about = "Classroom assistant robot simulator")]
struct Cli {
    /// TOML file with robot settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random draw; overrides config and ROBOT_SEED.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive command prompt (default).
    Shell,
    /// Run a fixed command sequence and print a summary.
    Demo {
        /// Also print the final status snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = RobotConfig::load(cli.config.as_deref()).context("load robot config")?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    info!(robot = %config.robot_id, seed = ?config.seed, "robot configured");
    let mut controller = Controller::from_config(&config);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let stdin = io::stdin();
            Shell::new(controller, stdin.lock(), io::stdout())
                .run()
                .context("shell i/o")?;
        }
        Command::Demo { json } => {
            sim::run_demo(&mut controller, &mut io::stdout().lock(), json)?;
        }
    }
    Ok(())
}
