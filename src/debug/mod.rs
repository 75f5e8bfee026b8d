//! Debugging support: stack walking and symbol resolution.

pub mod stack;
pub mod symbols;

pub use stack::{Frame, FrameWalker, StackReader, WordReader};
pub use symbols::{FunctionSymbol, LineEntry, SymbolInfo, SymbolResolver, SymbolTable};
