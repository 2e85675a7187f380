//! Interactive command shell: turns text lines into controller calls and
//! renders the results.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::debug;

use crate::controller::{Controller, DeliveryResult};
use crate::error::CommandError;

pub const COMMANDS_GUIDE: &str = "\
Commands:
  deliver <item> from <source> to <destination>   deliver an item
  deliver <item> <source> <destination>           same, short form
  monitor                                         check classroom temperature
  greet <name>                                    greet a student
  status                                          show what the robot is doing
  undo                                            undo the last logged action
  help                                            show this guide
  exit                                            power down";

const DELIVER_USAGE: &str = "deliver <item> from <source> to <destination>";
const GREET_USAGE: &str = "greet <name>";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Deliver {
        item: String,
        from_location: String,
        to_location: String,
    },
    Monitor,
    Greet(String),
    Status,
    Undo,
    Help,
    Exit,
}

impl FromStr for ShellCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, args)) = parts.split_first() else {
            return Err(CommandError::Empty);
        };
        match verb.to_ascii_lowercase().as_str() {
            "deliver" => parse_deliver(args),
            "greet" if !args.is_empty() => Ok(Self::Greet(args.join(" "))),
            "greet" => Err(CommandError::Usage(GREET_USAGE)),
            "monitor" => Ok(Self::Monitor),
            "status" => Ok(Self::Status),
            "undo" => Ok(Self::Undo),
            "help" => Ok(Self::Help),
            "exit" => Ok(Self::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Accepts `<item...> from <source...> to <dest...>` or `<item> <source> <dest...>`.
///
/// Once `from` appears the keyword form is required: a missing or empty
/// source or destination is a usage error, never a positional reread.
fn parse_deliver(args: &[&str]) -> Result<ShellCommand, CommandError> {
    let usage = || CommandError::Usage(DELIVER_USAGE);
    let from_at = args
        .iter()
        .skip(1)
        .position(|word| word.eq_ignore_ascii_case("from"))
        .map(|offset| offset + 1);

    let Some(from_at) = from_at else {
        if args.len() < 3 {
            return Err(usage());
        }
        return Ok(ShellCommand::Deliver {
            item: args[0].to_string(),
            from_location: args[1].to_string(),
            to_location: args[2..].join(" "),
        });
    };

    let to_at = args
        .iter()
        .skip(from_at + 2)
        .position(|word| word.eq_ignore_ascii_case("to"))
        .map(|offset| offset + from_at + 2)
        .ok_or_else(usage)?;
    if to_at + 1 >= args.len() {
        return Err(usage());
    }
    Ok(ShellCommand::Deliver {
        item: args[..from_at].join(" "),
        from_location: args[from_at + 1..to_at].join(" "),
        to_location: args[to_at + 1..].join(" "),
    })
}

/// Read-eval-print loop around one controller.
pub struct Shell<R, W> {
    input: R,
    output: W,
    controller: Controller,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(controller: Controller, input: R, output: W) -> Self {
        Self {
            input,
            output,
            controller,
        }
    }

    /// Run until `exit` is confirmed or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.controller.start();
        writeln!(
            self.output,
            "Hello, Teacher! I am your classroom robot {}, ready to assist you today.",
            self.controller.id()
        )?;
        writeln!(self.output, "{COMMANDS_GUIDE}")?;
        self.flush_messages()?;

        loop {
            let Some(line) = self.prompt("> ")? else {
                writeln!(self.output, "Input closed. Goodbye, Teacher!")?;
                break;
            };
            if line.is_empty() {
                continue;
            }
            let command = match line.parse::<ShellCommand>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "Sorry, {err}. Type 'help' to see what I can do.")?;
                    continue;
                }
            };
            debug!(?command, "shell command");
            if command == ShellCommand::Exit {
                if self.confirm_exit()? {
                    writeln!(self.output, "Mission complete, Teacher! Going to recharge. See you next time!")?;
                    break;
                }
                writeln!(self.output, "Still here, ready for your next command.")?;
                continue;
            }
            self.dispatch(command)?;
        }
        self.output.flush()
    }

    /// Print a prompt and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm_exit(&mut self) -> io::Result<bool> {
        let answer = self.prompt("Are you sure you want me to power down? (y/n): ")?;
        Ok(match answer {
            Some(answer) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            None => true,
        })
    }

    fn flush_messages(&mut self) -> io::Result<()> {
        for message in self.controller.drain_messages() {
            writeln!(self.output, "{message}")?;
        }
        Ok(())
    }

    fn dispatch(&mut self, command: ShellCommand) -> io::Result<()> {
        match command {
            ShellCommand::Deliver {
                item,
                from_location,
                to_location,
            } => {
                let result = self
                    .controller
                    .deliver_material(&item, &from_location, &to_location);
                self.flush_messages()?;
                match result {
                    DeliveryResult::Delivered { .. } => writeln!(
                        self.output,
                        "All done! I delivered {item} from {from_location} to {to_location}."
                    )?,
                    DeliveryResult::Failed { .. } => writeln!(
                        self.output,
                        "Oops, I couldn't deliver {item} ({result}). Please check the locations and try again."
                    )?,
                    DeliveryResult::NoTasks => writeln!(self.output, "{result}")?,
                }
            }
            ShellCommand::Monitor => {
                let report = self.controller.monitor_environment();
                self.flush_messages()?;
                if report.issue {
                    writeln!(
                        self.output,
                        "Alert! The classroom temperature is {:.2}°C, outside my safe range.",
                        report.temperature
                    )?;
                } else {
                    writeln!(
                        self.output,
                        "The classroom temperature is {:.2}°C. Everything is normal.",
                        report.temperature
                    )?;
                }
            }
            ShellCommand::Greet(name) => {
                let greeting = self.controller.greet_student(&name);
                self.flush_messages()?;
                writeln!(self.output, "Affirmative: {greeting}")?;
            }
            ShellCommand::Status => {
                let status = self.controller.get_status();
                writeln!(self.output, "Current status: {}", status.state)?;
                if status.task_queue.is_empty() {
                    writeln!(self.output, "No pending tasks. I'm all clear!")?;
                } else {
                    writeln!(self.output, "Pending tasks:")?;
                    for task in &status.task_queue {
                        writeln!(self.output, "  - {task}")?;
                    }
                }
                writeln!(
                    self.output,
                    "Events: {}, log entries: {}, temperature readings: {}",
                    status.history.len(),
                    status.interaction_log.len(),
                    status.temperature_history.len()
                )?;
            }
            ShellCommand::Undo => match self.controller.undo_last_interaction() {
                Some(entry) => writeln!(
                    self.output,
                    "I undid my last action: {} for {}.",
                    entry.action,
                    entry.actor.as_deref().unwrap_or("robot")
                )?,
                None => writeln!(self.output, "Nothing to undo. All is up to date!")?,
            },
            ShellCommand::Help => writeln!(self.output, "{COMMANDS_GUIDE}")?,
            ShellCommand::Exit => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;

    fn deliver(item: &str, from: &str, to: &str) -> ShellCommand {
        ShellCommand::Deliver {
            item: item.into(),
            from_location: from.into(),
            to_location: to.into(),
        }
    }

    fn run_script(script: &str) -> String {
        let config = RobotConfig {
            seed: Some(21),
            ..RobotConfig::default()
        };
        let mut output = Vec::new();
        Shell::new(Controller::from_config(&config), script.as_bytes(), &mut output)
            .run()
            .expect("shell run");
        String::from_utf8(output).expect("utf8 output")
    }

    #[test]
    fn parses_keyword_deliver() {
        let parsed: ShellCommand = "deliver book from teacher desk to room 12".parse().expect("parse");
        assert_eq!(parsed, deliver("book", "teacher desk", "room 12"));
    }

    #[test]
    fn parses_positional_deliver() {
        let parsed: ShellCommand = "DELIVER book teacher student lounge".parse().expect("parse");
        assert_eq!(parsed, deliver("book", "teacher", "student lounge"));
    }

    #[test]
    fn keyword_deliver_without_destination_is_rejected() {
        for line in [
            "deliver book from teacher to",
            "deliver book from teacher",
            "deliver book from to student",
            "deliver book from",
        ] {
            assert_eq!(
                line.parse::<ShellCommand>(),
                Err(CommandError::Usage(DELIVER_USAGE)),
                "{line}"
            );
        }
    }

    #[test]
    fn keyword_deliver_takes_multiword_item() {
        let parsed: ShellCommand = "deliver red pen from shelf to desk".parse().expect("parse");
        assert_eq!(parsed, deliver("red pen", "shelf", "desk"));
    }

    #[test]
    fn rejected_deliver_does_not_reach_controller() {
        let out = run_script("deliver book from teacher to\nstatus\n");
        assert!(out.contains("Sorry, usage: deliver <item> from <source> to <destination>."));
        assert!(!out.contains("Executing delivery"));
        assert!(out.contains("Events: 0, log entries: 0"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<ShellCommand>(), Err(CommandError::Empty));
        assert_eq!("   ".parse::<ShellCommand>(), Err(CommandError::Empty));
        assert_eq!(
            "deliver book".parse::<ShellCommand>(),
            Err(CommandError::Usage(DELIVER_USAGE))
        );
        assert_eq!("greet".parse::<ShellCommand>(), Err(CommandError::Usage(GREET_USAGE)));
        assert_eq!(
            "dance now".parse::<ShellCommand>(),
            Err(CommandError::Unknown("dance".into()))
        );
    }

    #[test]
    fn parses_simple_verbs_and_multiword_names() {
        assert_eq!("monitor".parse::<ShellCommand>(), Ok(ShellCommand::Monitor));
        assert_eq!("Status".parse::<ShellCommand>(), Ok(ShellCommand::Status));
        assert_eq!("undo".parse::<ShellCommand>(), Ok(ShellCommand::Undo));
        assert_eq!("help".parse::<ShellCommand>(), Ok(ShellCommand::Help));
        assert_eq!("exit".parse::<ShellCommand>(), Ok(ShellCommand::Exit));
        assert_eq!("greet Mary Ann".parse::<ShellCommand>(), Ok(ShellCommand::Greet("Mary Ann".into())));
    }

    #[test]
    fn session_greets_and_undoes() {
        let out = run_script("greet Ana\nundo\nundo\nexit\ny\n");
        assert!(out.contains("[Robot] Robot ready."));
        assert!(out.contains("[Robot] Hello, Ana!"));
        assert!(out.contains("Affirmative: Hello, Ana!"));
        assert!(out.contains("I undid my last action: greet for Ana."));
        assert!(out.contains("Nothing to undo."));
        assert!(out.contains("Mission complete"));
    }

    #[test]
    fn declined_exit_keeps_running() {
        let out = run_script("exit\nn\nstatus\n");
        assert!(out.contains("Still here"));
        assert!(out.contains("Current status: Idle"));
        assert!(out.contains("No pending tasks."));
        assert!(out.contains("Input closed."));
    }

    #[test]
    fn bad_command_does_not_stop_loop() {
        let out = run_script("fly away\ngreet\nmonitor\n");
        assert!(out.contains("Sorry, unknown command: fly."));
        assert!(out.contains("Sorry, usage: greet <name>."));
        assert!(out.contains("The classroom temperature is"));
    }

    #[test]
    fn delivery_reports_an_outcome() {
        let out = run_script("deliver book from teacher to student\n");
        assert!(out.contains("[Robot] Executing delivery book -> student"));
        assert!(
            out.contains("All done! I delivered book from teacher to student.")
                || out.contains("Oops, I couldn't deliver book")
        );
    }
}
