//! HAL (Hardware Abstraction Layer) module.
//!
//! The few architecture facts the monitor needs: the saved trap context, the
//! live frame pointer, and an IRQ-masking spin lock for console output.

pub mod context;
pub mod cpu;
pub mod spin;

pub use context::TrapFrame;
pub use cpu::read_frame_pointer;
pub use spin::{Mutex, SpinNoIrq};
