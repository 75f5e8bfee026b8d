//! Trap context handed to the monitor.

use core::fmt;

/// Saved registers when a trap (exception) occurs.
#[repr(C)]
#[derive(Default, Clone, Copy)]
pub struct TrapFrame {
    /// General-purpose registers (R0..R30).
    pub r: [u64; 31],
    /// User Stack Pointer (SP_EL0).
    pub usp: u64,
    /// Exception Link Register (ELR_EL1).
    pub elr: u64,
    /// Saved Process Status Register (SPSR_EL1).
    pub spsr: u64,
}

impl TrapFrame {
    /// Frame pointer (x29) of the trapped context.
    pub const fn frame_pointer(&self) -> usize {
        self.r[29] as usize
    }

    /// Link register (x30) of the trapped context.
    pub const fn link_register(&self) -> usize {
        self.r[30] as usize
    }

    /// Builds a frame whose only meaningful register is the frame pointer.
    pub fn with_frame_pointer(fp: usize) -> Self {
        let mut tf = Self::default();
        tf.r[29] = fp as u64;
        tf
    }
}

impl fmt::Debug for TrapFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TrapFrame: {{")?;
        for (i, &reg) in self.r.iter().enumerate() {
            writeln!(f, "    r{i}: {reg:#x},")?;
        }
        writeln!(f, "    usp: {:#x},", self.usp)?;
        writeln!(f, "    elr: {:#x},", self.elr)?;
        writeln!(f, "    spsr: {:#x},", self.spsr)?;
        write!(f, "}}")?;
        Ok(())
    }
}
