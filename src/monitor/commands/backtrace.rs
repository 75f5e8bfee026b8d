//! Backtrace command - walks the frame-pointer chain.

use crate::MonitorResult;
use crate::debug::{FrameWalker, SymbolInfo};
use crate::error::MonitorError;
use crate::hal::read_frame_pointer;
use crate::monitor::command::{CONTINUE, Command, CommandContext, outln};

/// Backtrace command instance.
pub static BACKTRACE: BacktraceCommand = BacktraceCommand;

/// Backtrace command implementation.
pub struct BacktraceCommand;

impl Command for BacktraceCommand {
    fn name(&self) -> &'static str {
        "backtrace"
    }

    fn description(&self) -> &'static str {
        "Display a backtrace of the kernel stack"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> MonitorResult<i32> {
        // Start from the trapped context when there is one.
        let fp = match ctx.trap_frame {
            Some(tf) => tf.frame_pointer(),
            None => read_frame_pointer(),
        };
        let kernel = ctx.kernel;

        outln!(ctx, "Stack backtrace:");
        for frame in FrameWalker::new(kernel.stack, fp) {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("backtrace: {e:#}");
                    outln!(ctx, "  {e:#}");
                    break;
                }
            };
            outln!(ctx, "  {frame}");

            let symbol = kernel.symbols.resolve(frame.ra).unwrap_or_else(|| {
                warn!("backtrace: {}", MonitorError::SymbolMiss(frame.ra));
                SymbolInfo::unknown(frame.ra)
            });
            outln!(ctx, "         {}", symbol.display_at(frame.ra));
        }
        Ok(CONTINUE)
    }
}
