//! Instruction address to source location resolution.

use alloc::vec::Vec;
use core::fmt;

/// Source location of an instruction address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo<'a> {
    pub file: &'a str,
    pub line: u32,
    /// Name of the enclosing function.
    pub name: &'a str,
    /// Address of the first instruction of the enclosing function.
    pub start: usize,
}

impl SymbolInfo<'static> {
    /// Placeholder used when no symbol covers `pc`.
    pub const fn unknown(pc: usize) -> Self {
        Self {
            file: "<unknown>",
            line: 0,
            name: "<unknown>",
            start: pc,
        }
    }
}

impl SymbolInfo<'_> {
    /// Offset of `pc` from the start of the function.
    pub fn offset(&self, pc: usize) -> usize {
        pc.wrapping_sub(self.start)
    }

    /// Formats as `file:line: name+offset` for the given address.
    pub fn display_at(&self, pc: usize) -> impl fmt::Display + '_ {
        struct At<'s, 'a>(&'s SymbolInfo<'a>, usize);

        impl fmt::Display for At<'_, '_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let sym = self.0;
                write!(f, "{}:{}: {}+{:#x}", sym.file, sym.line, sym.name, sym.offset(self.1))
            }
        }

        At(self, pc)
    }
}

/// Maps instruction addresses to symbols.
pub trait SymbolResolver {
    /// Returns `None` when no symbol covers `pc`.
    fn resolve(&self, pc: usize) -> Option<SymbolInfo<'_>>;
}

/// A function covering `[start, start + size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub start: usize,
    pub size: usize,
    pub name: &'static str,
    pub file: &'static str,
}

impl FunctionSymbol {
    fn contains(&self, pc: usize) -> bool {
        pc >= self.start && pc - self.start < self.size
    }
}

/// First instruction address of a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEntry {
    pub addr: usize,
    pub line: u32,
}

/// Sorted in-memory symbol table with a line table.
///
/// Usually generated from the kernel image at build time.
#[derive(Debug, Default)]
pub struct SymbolTable {
    functions: Vec<FunctionSymbol>,
    lines: Vec<LineEntry>,
}

impl SymbolTable {
    pub fn new(mut functions: Vec<FunctionSymbol>, mut lines: Vec<LineEntry>) -> Self {
        functions.sort_unstable_by_key(|f| f.start);
        lines.sort_unstable_by_key(|l| l.addr);
        Self { functions, lines }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn function_at(&self, pc: usize) -> Option<&FunctionSymbol> {
        let idx = self.functions.partition_point(|f| f.start <= pc);
        let func = self.functions.get(idx.checked_sub(1)?)?;
        func.contains(pc).then_some(func)
    }

    /// Line of the last line entry at or below `pc` within `func`.
    fn line_at(&self, func: &FunctionSymbol, pc: usize) -> u32 {
        let idx = self.lines.partition_point(|l| l.addr <= pc);
        match idx.checked_sub(1).map(|i| self.lines[i]) {
            Some(entry) if entry.addr >= func.start => entry.line,
            _ => 0,
        }
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, pc: usize) -> Option<SymbolInfo<'_>> {
        let func = self.function_at(pc)?;
        Some(SymbolInfo {
            file: func.file,
            line: self.line_at(func, pc),
            name: func.name,
            start: func.start,
        })
    }
}
