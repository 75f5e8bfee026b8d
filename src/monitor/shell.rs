//! Tokenizer, dispatcher and the shell loop.

use alloc::string::String;
use alloc::vec::Vec;

use super::command::{Args, CONTINUE, CommandContext};
use super::{KernelView, Registry};
use crate::MonitorResult;
use crate::config::monitor::{BANNER, HINT, MAX_ARGS, PROMPT, WHITESPACE};
use crate::console::Console;
use crate::error::MonitorError;
use crate::hal::TrapFrame;

/// Splits a line into whitespace-separated tokens.
///
/// Runs of tab, CR, LF and space separate tokens. The argument vector keeps
/// its last slot free, so a line reaching [`MAX_ARGS`] tokens is rejected
/// whole.
pub fn tokenize(line: &str) -> MonitorResult<Args<'_>> {
    let mut argv = Vec::new();
    for token in line.split(WHITESPACE).filter(|t| !t.is_empty()) {
        if argv.len() == MAX_ARGS - 1 {
            anyhow::bail!(MonitorError::TooManyArguments);
        }
        argv.push(token);
    }
    Ok(Args::new(argv))
}

/// States of the shell loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    /// Waiting for the next input line.
    ReadLine,
    /// A line was read and is about to run.
    Dispatch(String),
    /// The shell returns to its caller.
    Exit,
}

/// The kernel monitor: a registry plus the read-dispatch loop.
pub struct Monitor {
    registry: Registry,
}

impl Monitor {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn with_builtin_commands() -> Self {
        Self::new(Registry::builtin())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tokenizes `line` and runs the matching command.
    ///
    /// Returns the handler status, or [`CONTINUE`] when no handler ran.
    /// Every failure is reported on `console` as one line.
    pub fn run_command(
        &self,
        line: &str,
        console: &mut dyn Console,
        kernel: &KernelView<'_>,
        trap_frame: Option<&TrapFrame>,
    ) -> i32 {
        let args = match tokenize(line) {
            Ok(args) => args,
            Err(e) => {
                let _ = writeln!(console, "{e:#}");
                return CONTINUE;
            }
        };
        let Some(name) = args.command() else {
            return CONTINUE;
        };
        let Some(cmd) = self.registry.find(name) else {
            debug!("monitor: unknown command {name:?}");
            let _ = writeln!(console, "{}", MonitorError::UnknownCommand(name.into()));
            return CONTINUE;
        };

        debug!("monitor: running {name} with {} argument(s)", args.len());
        let mut ctx = CommandContext {
            args,
            console,
            kernel,
            trap_frame,
            registry: &self.registry,
        };
        match cmd.execute(&mut ctx) {
            Ok(status) => status,
            Err(e) => {
                debug!("monitor: {name} failed: {e:#}");
                let _ = writeln!(ctx.console, "{e:#}");
                CONTINUE
            }
        }
    }

    /// Advances the shell by one state transition.
    pub fn step(
        &self,
        state: ShellState,
        console: &mut dyn Console,
        kernel: &KernelView<'_>,
        trap_frame: Option<&TrapFrame>,
    ) -> ShellState {
        match state {
            ShellState::ReadLine => match console.read_line(PROMPT) {
                Some(line) => ShellState::Dispatch(line),
                None => ShellState::ReadLine,
            },
            ShellState::Dispatch(line) => {
                if self.run_command(&line, console, kernel, trap_frame) < 0 {
                    ShellState::Exit
                } else {
                    ShellState::ReadLine
                }
            }
            ShellState::Exit => ShellState::Exit,
        }
    }

    /// Prints the banner and serves commands until one asks to exit.
    pub fn run(&self, console: &mut dyn Console, kernel: &KernelView<'_>, trap_frame: Option<&TrapFrame>) {
        info!("monitor: entered");
        let _ = writeln!(console, "{BANNER}");
        let _ = writeln!(console, "{HINT}");

        let mut state = ShellState::ReadLine;
        while state != ShellState::Exit {
            state = self.step(state, console, kernel, trap_frame);
        }
        info!("monitor: exit");
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::with_builtin_commands()
    }
}
