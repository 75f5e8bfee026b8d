//! IRQ-masking spin lock.
//!
//! Console output may be produced from a trap handler that interrupted a
//! printing context, so the lock masks IRQs while held and restores the
//! previous mask state on release.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use lock_api::{GuardSend, RawMutex};

use super::cpu::{disable_irqs, enable_irqs, irqs_disabled};

pub struct SpinNoIrq {
    locked: AtomicBool,
    /// IRQ state of the holder before it took the lock.
    irqs_were_enabled: UnsafeCell<bool>,
}

// The cell is only touched by the lock holder.
unsafe impl Sync for SpinNoIrq {}
unsafe impl Send for SpinNoIrq {}

unsafe impl RawMutex for SpinNoIrq {
    type GuardMarker = GuardSend;

    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        locked: AtomicBool::new(false),
        irqs_were_enabled: UnsafeCell::new(false),
    };

    fn lock(&self) {
        while !self.try_lock() {
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        let enabled = !irqs_disabled();
        disable_irqs();
        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            unsafe { *self.irqs_were_enabled.get() = enabled };
            return true;
        }
        if enabled {
            enable_irqs();
        }
        false
    }

    unsafe fn unlock(&self) {
        let enabled = unsafe { *self.irqs_were_enabled.get() };
        self.locked.store(false, Ordering::Release);
        if enabled {
            enable_irqs();
        }
    }
}

pub type Mutex<T> = lock_api::Mutex<SpinNoIrq, T>;
