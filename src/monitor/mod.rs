//! Kernel monitor - command registry, dispatcher and built-in commands.
//!
//! # Architecture
//!
//! - `command.rs` - the `Command` trait and execution context
//! - `registry.rs` - ordered command table owned by a [`Monitor`]
//! - `shell.rs` - tokenizer, dispatcher and read/dispatch loop
//! - `commands/` - built-in command implementations
//!
//! # Adding a New Command
//!
//! 1. Create a new file in `commands/` (e.g., `commands/mycommand.rs`)
//! 2. Define a struct and implement the `Command` trait
//! 3. Export a static instance: `pub static MYCOMMAND: MyCommand = MyCommand;`
//! 4. Add it to the table passed to [`Registry::new`], or to the built-in
//!    table in `registry.rs`

pub mod command;
pub mod commands;
pub mod registry;
pub mod shell;

use memory_addr::{PhysAddr, VirtAddr};

use crate::config::monitor::PHYS_VIRT_OFFSET;
use crate::debug::{SymbolResolver, WordReader};
use crate::mm::AddressSpace;

pub use command::{Args, CONTINUE, Command, CommandContext, EXIT};
pub use registry::Registry;
pub use shell::{Monitor, ShellState, tokenize};

/// Boundaries of the loaded kernel image, as virtual addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelLayout {
    /// Lowest address of the image.
    pub start: VirtAddr,
    /// Kernel entry point.
    pub entry: VirtAddr,
    /// End of the text section.
    pub etext: VirtAddr,
    /// End of initialized data.
    pub edata: VirtAddr,
    /// End of the image, bss included.
    pub end: VirtAddr,
    /// Offset of the kernel's linear mapping above physical memory.
    pub phys_virt_offset: usize,
}

impl KernelLayout {
    /// Physical address of a kernel image address.
    pub const fn virt_to_phys(&self, vaddr: VirtAddr) -> PhysAddr {
        PhysAddr::from_usize(vaddr.as_usize().wrapping_sub(self.phys_virt_offset))
    }

    /// Image size from entry to end, in KiB rounded up.
    pub const fn footprint_kib(&self) -> usize {
        self.end.as_usize().saturating_sub(self.entry.as_usize()).div_ceil(1024)
    }

    /// Reads the layout from the linker-script section symbols.
    #[cfg(target_os = "none")]
    pub fn from_linker() -> Self {
        unsafe extern "C" {
            fn _skernel();
            fn _stext();
            fn _etext();
            fn _edata();
            fn _ekernel();
        }

        Self {
            start: VirtAddr::from_usize(_skernel as usize),
            entry: VirtAddr::from_usize(_stext as usize),
            etext: VirtAddr::from_usize(_etext as usize),
            edata: VirtAddr::from_usize(_edata as usize),
            end: VirtAddr::from_usize(_ekernel as usize),
            phys_virt_offset: PHYS_VIRT_OFFSET,
        }
    }
}

impl Default for KernelLayout {
    fn default() -> Self {
        let zero = VirtAddr::from_usize(PHYS_VIRT_OFFSET);
        Self {
            start: zero,
            entry: zero,
            etext: zero,
            edata: zero,
            end: zero,
            phys_virt_offset: PHYS_VIRT_OFFSET,
        }
    }
}

/// Read-only access to the kernel state the monitor inspects.
///
/// The monitor assumes nothing mutates these while it runs (single core,
/// interrupts quiesced). A preemptible or SMP kernel must hold its address
/// space lock for the duration of a command.
#[derive(Clone, Copy)]
pub struct KernelView<'a> {
    /// Memory holding the frame-pointer chain.
    pub stack: &'a dyn WordReader,
    pub symbols: &'a dyn SymbolResolver,
    /// Address space translated by `showva2pa`.
    pub address_space: &'a dyn AddressSpace,
    pub layout: KernelLayout,
}
