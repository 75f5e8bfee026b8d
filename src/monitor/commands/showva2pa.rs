//! Showva2pa command - virtual to physical translation of an address range.

use alloc::string::ToString;

use memory_addr::VirtAddr;

use crate::MonitorResult;
use crate::error::MonitorError;
use crate::mm::{PAGE_STRIDE, translate};
use crate::monitor::command::{CONTINUE, Command, CommandContext, outln};

/// Showva2pa command instance.
pub static SHOWVA2PA: ShowVa2PaCommand = ShowVa2PaCommand;

/// Showva2pa command implementation.
pub struct ShowVa2PaCommand;

/// Parses a hexadecimal address, with or without a `0x` prefix.
pub fn parse_hex(token: &str) -> MonitorResult<usize> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    usize::from_str_radix(digits, 16)
        .map_err(|_| anyhow::anyhow!(MonitorError::InvalidAddress(token.to_string())))
}

/// Inclusive scan bounds from one or two address arguments.
///
/// A single address scans just that address; swapped bounds are reordered.
pub fn parse_range(args: &[&str]) -> MonitorResult<(usize, usize)> {
    match *args {
        [] => anyhow::bail!(MonitorError::Usage("At least one argument.")),
        [addr] => {
            let va = parse_hex(addr)?;
            Ok((va, va))
        }
        [a, b] => {
            let (a, b) = (parse_hex(a)?, parse_hex(b)?);
            Ok(if a <= b { (a, b) } else { (b, a) })
        }
        _ => anyhow::bail!(MonitorError::Usage("Too many arguments (max 2)")),
    }
}

impl Command for ShowVa2PaCommand {
    fn name(&self) -> &'static str {
        "showva2pa"
    }

    fn description(&self) -> &'static str {
        "Display the physical pages information corresponding to the designated virtual addresses"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> MonitorResult<i32> {
        let (low, high) = parse_range(ctx.args.argv().get(1..).unwrap_or(&[]))?;
        let space = ctx.kernel.address_space;
        debug!("showva2pa: scanning {low:#x}..={high:#x}");

        let mut va = low;
        loop {
            let vaddr = VirtAddr::from_usize(va);
            match translate(space, vaddr) {
                Some(t) => outln!(ctx, "{t}"),
                None => outln!(ctx, "{}", MonitorError::Unmapped(vaddr)),
            }
            match va.checked_add(PAGE_STRIDE) {
                Some(next) if next <= high => va = next,
                _ => break,
            }
        }
        Ok(CONTINUE)
    }
}
