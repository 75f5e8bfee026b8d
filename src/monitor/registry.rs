//! Command registry - ordered command table and lookup.

use alloc::vec::Vec;

use super::command::Command;
use super::commands;

/// Commands every monitor starts with.
static BUILTIN: &[&dyn Command] = &[
    &commands::HELP,
    &commands::KERNINFO,
    &commands::BACKTRACE,
    &commands::SHOWVA2PA,
];

/// Ordered table of commands owned by one monitor instance.
///
/// Built once at startup and never modified. Names are expected to be
/// unique; on duplicates the first entry wins.
pub struct Registry {
    commands: Vec<&'static dyn Command>,
}

impl Registry {
    pub fn new(commands: &[&'static dyn Command]) -> Self {
        Self {
            commands: commands.to_vec(),
        }
    }

    /// The built-in monitor commands.
    pub fn builtin() -> Self {
        Self::new(BUILTIN)
    }

    /// Find a command by exact name.
    pub fn find(&self, name: &str) -> Option<&'static dyn Command> {
        self.commands.iter().copied().find(|cmd| cmd.name() == name)
    }

    /// All registered commands, in registration order.
    pub fn list(&self) -> &[&'static dyn Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
