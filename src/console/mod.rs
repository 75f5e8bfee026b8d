//! Console module - operator I/O, print and logging facilities.
//!
//! The monitor talks to the operator through a [`Console`]: a blocking line
//! reader plus a formatted writer. [`tty::TtyConsole`] builds one on top of a
//! byte-level serial port; tests plug in scripted consoles.
//!
//! Kernel-wide `print!`/`println!` output and the `log` backend go through a
//! sink registered once with [`print::set_sink`].

pub mod logger;

#[macro_use]
pub mod print;

pub mod tty;

use alloc::string::String;
use core::fmt::Write;

pub use logger::init as init_logger;
pub use print::set_sink;
pub use tty::{SerialIo, TtyConsole};

/// Line-oriented operator console.
pub trait Console: Write {
    /// Prints `prompt` and blocks until a full line is read.
    ///
    /// Returns `None` when the read fails (end of input, line discarded).
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}
