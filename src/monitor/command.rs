//! Command trait and context definitions.

use alloc::vec::Vec;
use core::fmt;

use super::{KernelView, Registry};
use crate::MonitorResult;
use crate::console::Console;
use crate::hal::TrapFrame;

/// Handler status that keeps the shell reading input.
pub const CONTINUE: i32 = 0;

/// Conventional handler status that stops the shell. Any negative value does.
pub const EXIT: i32 = -1;

/// Tokens of one command line, command name included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args<'a> {
    argv: Vec<&'a str>,
}

impl<'a> Args<'a> {
    pub fn new(argv: Vec<&'a str>) -> Self {
        Self { argv }
    }

    /// The command name, if the line was not empty.
    pub fn command(&self) -> Option<&'a str> {
        self.argv.first().copied()
    }

    /// Get argument at index (0 is first argument after command name).
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.argv.get(index + 1).copied()
    }

    /// Number of arguments after the command name.
    pub fn len(&self) -> usize {
        self.argv.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total token count, command name included.
    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn argv(&self) -> &[&'a str] {
        &self.argv
    }

    /// Iterate over arguments after the command name.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.argv.iter().skip(1).copied()
    }
}

/// Everything a command may touch while it runs.
pub struct CommandContext<'a> {
    pub args: Args<'a>,
    pub console: &'a mut dyn Console,
    pub kernel: &'a KernelView<'a>,
    /// Trap frame the monitor was entered with, if any.
    pub trap_frame: Option<&'a TrapFrame>,
    pub registry: &'a Registry,
}

impl CommandContext<'_> {
    /// Writes to the operator console. Console write errors are dropped.
    pub fn print(&mut self, args: fmt::Arguments) {
        let _ = self.console.write_fmt(args);
    }
}

/// Prints a line to the command's console.
macro_rules! outln {
    ($ctx:expr) => {
        $ctx.print(format_args!("\n"))
    };
    ($ctx:expr, $($arg:tt)*) => {
        $ctx.print(format_args!("{}\n", format_args!($($arg)*)))
    };
}

pub(crate) use outln;

/// Trait for implementing commands.
///
/// Commands live in statics and are looked up by exact name.
pub trait Command: Sync {
    /// Command name typed by the operator.
    fn name(&self) -> &'static str;

    /// Short description (shown by `help`).
    fn description(&self) -> &'static str;

    /// Runs the command.
    ///
    /// Returns a status: negative stops the shell, anything else continues.
    /// An `Err` is reported to the operator and the shell continues.
    fn execute(&self, ctx: &mut CommandContext<'_>) -> MonitorResult<i32>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn args_skip_command_name() {
        let args = Args::new(vec!["showva2pa", "10", "20"]);
        assert_eq!(args.command(), Some("showva2pa"));
        assert_eq!(args.argc(), 3);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("10"));
        assert_eq!(args.get(2), None);
        assert_eq!(args.iter().collect::<Vec<_>>(), ["10", "20"]);
    }

    #[test]
    fn empty_args_have_no_command() {
        let args = Args::new(Vec::new());
        assert_eq!(args.command(), None);
        assert!(args.is_empty());
    }
}
