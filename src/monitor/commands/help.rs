//! Help command - lists the registered commands.

use crate::MonitorResult;
use crate::monitor::command::{CONTINUE, Command, CommandContext, outln};

/// Help command instance.
pub static HELP: HelpCommand = HelpCommand;

/// Help command implementation.
pub struct HelpCommand;

impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "Display this list of commands"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> MonitorResult<i32> {
        // One line per command, in registry order. Arguments are ignored.
        let registry = ctx.registry;
        for cmd in registry.list() {
            outln!(ctx, "{} - {}", cmd.name(), cmd.description());
        }
        Ok(CONTINUE)
    }
}
