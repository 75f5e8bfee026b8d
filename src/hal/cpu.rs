//! CPU-related operations and utilities.

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
use core::arch::asm;

/// Reads the frame pointer of the caller's frame.
///
/// Meaningful only when the kernel is built with frame pointers
/// (`-C force-frame-pointers=yes`). Returns 0 on architectures without
/// support, which makes a backtrace print nothing.
#[inline(always)]
pub fn read_frame_pointer() -> usize {
    let fp: usize;
    #[cfg(target_arch = "aarch64")]
    unsafe {
        asm!("mov {}, x29", out(reg) fp, options(nomem, nostack, preserves_flags));
    }
    #[cfg(target_arch = "x86_64")]
    unsafe {
        asm!("mov {}, rbp", out(reg) fp, options(nomem, nostack, preserves_flags));
    }
    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
    {
        fp = 0;
    }
    fp
}

/// Returns whether IRQs are masked on the current CPU.
#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub fn irqs_disabled() -> bool {
    use aarch64_cpu::registers::{DAIF, Readable};
    DAIF.is_set(DAIF::I)
}

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub fn disable_irqs() {
    unsafe { asm!("msr daifset, #2") };
}

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
pub fn enable_irqs() {
    unsafe { asm!("msr daifclr, #2") };
}

// Hosted builds (tests, tools) have no interrupt state to manage.
#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub fn irqs_disabled() -> bool {
    true
}

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub fn disable_irqs() {}

#[cfg(not(all(target_arch = "aarch64", target_os = "none")))]
pub fn enable_irqs() {}
