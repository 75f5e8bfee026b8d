//! Memory management views used by the monitor.
//!
//! Only read-only queries live here; page-table construction, page
//! reference counting and frame allocation belong to the kernel proper.

pub mod paging;

pub use memory_addr::{PAGE_SIZE_4K, PhysAddr, VirtAddr};
pub use paging::{
    AddressSpace, EntryPermissions, GenericPTE, MappingFlags, PageInfo, PageTableEntry,
    Translation, translate,
};

/// Granularity of per-entry page table lookups.
pub const PAGE_STRIDE: usize = PAGE_SIZE_4K;
