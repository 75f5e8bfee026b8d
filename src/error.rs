//! Unified error types for the kernel monitor.
//!
//! Like the rest of the kernel, the monitor uses anyhow for flexible error
//! handling in a no_std environment. Every fallible path returns
//! [`MonitorResult<T>`], an alias for `anyhow::Result<T>`.
//!
//! Conditions the operator can cause are typed as [`MonitorError`] so that the
//! dispatcher (and tests) can tell them apart:
//!
//! ```ignore
//! anyhow::bail!(MonitorError::Usage("At least one argument."));
//!
//! if let Some(MonitorError::Unmapped(va)) = err.downcast_ref() { ... }
//! ```
//!
//! None of these conditions is fatal: the dispatcher reports them on the
//! console as a single line and the shell keeps reading input.

use alloc::string::String;
use core::fmt;

use memory_addr::VirtAddr;

use crate::config::monitor::MAX_ARGS;

/// Result type alias using anyhow::Error.
pub type MonitorResult<T> = anyhow::Result<T>;

/// Recoverable monitor conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// The first token matches no registered command.
    UnknownCommand(String),
    /// The line fills all [`MAX_ARGS`] token slots.
    TooManyArguments,
    /// A command was invoked with a malformed argument list.
    Usage(&'static str),
    /// An address argument is not a hexadecimal number.
    InvalidAddress(String),
    /// No physical page backs the virtual address.
    Unmapped(VirtAddr),
    /// The symbol table has no entry covering the address.
    SymbolMiss(usize),
    /// A frame word could not be read from stack memory.
    BadFrameRead(usize),
    /// The frame chain did not terminate within the frame cap.
    FrameLimit(usize),
    /// The logger was already installed.
    LoggerInitFailed,
    /// The console output sink was already registered.
    SinkAlreadySet,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "Unknown command '{name}'"),
            Self::TooManyArguments => write!(f, "Too many arguments (max {MAX_ARGS})"),
            Self::Usage(msg) => f.write_str(msg),
            Self::InvalidAddress(tok) => write!(f, "Invalid address '{tok}'"),
            Self::Unmapped(va) => write!(
                f,
                "VA: {:#0width$x} does not have a mapped physical page!",
                va.as_usize(),
                width = crate::ADDR_WIDTH
            ),
            Self::SymbolMiss(pc) => write!(f, "no symbol covers {pc:#x}"),
            Self::BadFrameRead(addr) => write!(f, "cannot read stack word at {addr:#x}"),
            Self::FrameLimit(max) => write!(f, "backtrace truncated after {max} frames"),
            Self::LoggerInitFailed => write!(f, "logger already initialized"),
            Self::SinkAlreadySet => write!(f, "console sink already registered"),
        }
    }
}

impl core::error::Error for MonitorError {}
