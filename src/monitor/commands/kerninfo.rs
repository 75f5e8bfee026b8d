//! Kerninfo command - kernel image layout and footprint.

use memory_addr::VirtAddr;

use crate::monitor::command::{CONTINUE, Command, CommandContext, outln};
use crate::{ADDR_WIDTH, MonitorResult};

/// Kerninfo command instance.
pub static KERNINFO: KerninfoCommand = KerninfoCommand;

/// Kerninfo command implementation.
pub struct KerninfoCommand;

impl Command for KerninfoCommand {
    fn name(&self) -> &'static str {
        "kerninfo"
    }

    fn description(&self) -> &'static str {
        "Display information about the kernel"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> MonitorResult<i32> {
        let layout = ctx.kernel.layout;
        let symbols: [(&str, VirtAddr); 5] = [
            ("start", layout.start),
            ("entry", layout.entry),
            ("etext", layout.etext),
            ("edata", layout.edata),
            ("end", layout.end),
        ];

        outln!(ctx, "Special kernel symbols:");
        for (name, vaddr) in symbols {
            outln!(
                ctx,
                "  {name:<6} {:#0w$x} (virt)  {:#0w$x} (phys)",
                vaddr.as_usize(),
                layout.virt_to_phys(vaddr).as_usize(),
                w = ADDR_WIDTH,
            );
        }
        outln!(
            ctx,
            "Kernel executable memory footprint: {}KB",
            layout.footprint_kib()
        );
        Ok(CONTINUE)
    }
}
