//! Monitor configuration constants.

/// Prompt printed before every line read.
pub const PROMPT: &str = "K> ";

pub const BANNER: &str = "Welcome to the kernel monitor!";
pub const HINT: &str = "Type 'help' for a list of commands.";

/// Whitespace bytes separating tokens on a command line.
pub const WHITESPACE: &[char] = &['\t', '\r', '\n', ' '];

/// Token slots per line, command name included. The last slot stays free,
/// so a line holding this many tokens is rejected.
pub const MAX_ARGS: usize = 16;

/// Upper bound on frames visited by a single backtrace.
pub const MAX_FRAMES: usize = 64;

/// Raw argument words printed per frame.
pub const FRAME_ARGS: usize = 5;

/// Maximum length of an edited input line.
pub const MAX_LINE: usize = 1024;

/// Physical-to-virtual offset of the kernel's linear mapping.
pub const PHYS_VIRT_OFFSET: usize = 0xffff_0000_0000_0000;

/// Log level selected at build time (`LOG=debug cargo build`).
pub const LOG_LEVEL: Option<&str> = option_env!("LOG");
