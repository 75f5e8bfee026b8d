//! Built-in command implementations.
//!
//! Each command is defined in its own module file.

pub mod backtrace;
pub mod help;
pub mod kerninfo;
pub mod showva2pa;

// Re-export command instances for the registry
pub use backtrace::BACKTRACE;
pub use help::HELP;
pub use kerninfo::KERNINFO;
pub use showva2pa::SHOWVA2PA;
