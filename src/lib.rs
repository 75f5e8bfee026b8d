//! kmonitor - interactive kernel monitor.
//!
//! An operator shell embedded in the kernel that inspects live state from the
//! serial console: the frame-pointer call chain (`backtrace`) and the
//! virtual-to-physical mappings of the kernel address space (`showva2pa`).
//!
//! The monitor owns no kernel state. Page tables, physical page metadata and
//! the symbol table are read through the collaborator traits bundled in
//! [`KernelView`], and all input/output goes through a [`Console`].
//!
//! ```ignore
//! let monitor = Monitor::with_builtin_commands();
//! monitor.run(&mut console, &view, Some(trap_frame));
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

extern crate alloc;

#[macro_use]
pub mod console;

pub mod config;
pub mod debug;
pub mod error;
pub mod hal;
pub mod mm;
pub mod monitor;

pub use console::Console;
pub use error::{MonitorError, MonitorResult};
pub use hal::TrapFrame;
pub use monitor::{KernelView, Monitor, Registry};

/// Hex digits in a machine word.
pub(crate) const WORD_WIDTH: usize = 2 * core::mem::size_of::<usize>();

/// Printed width of an address, `0x` prefix included.
pub(crate) const ADDR_WIDTH: usize = 2 + WORD_WIDTH;
