//! Page table entries and the read-only address space view.
//!
//! The monitor never walks or edits page tables itself. It asks an
//! [`AddressSpace`] for the entry mapping a virtual address, then for the
//! physical page behind it, and decodes the permission bits of the entry.

use core::fmt;

use memory_addr::{PhysAddr, VirtAddr};
pub use page_table_entry::{GenericPTE, MappingFlags};

use crate::ADDR_WIDTH;

/// Entry type produced by the kernel's page tables.
#[cfg(target_arch = "aarch64")]
pub use page_table_entry::aarch64::A64PTE as PageTableEntry;

#[cfg(not(target_arch = "aarch64"))]
pub use host::HostPTE as PageTableEntry;

/// Permission bits the monitor reports for a mapping.
pub trait EntryPermissions: GenericPTE {
    fn is_writable(&self) -> bool {
        self.flags().contains(MappingFlags::WRITE)
    }

    fn is_user_accessible(&self) -> bool {
        self.flags().contains(MappingFlags::USER)
    }
}

impl<T: GenericPTE> EntryPermissions for T {}

/// VMSAv8-64 page descriptors decoded on hosts that have no native
/// `page_table_entry` backend for them. Only the bits the monitor reads
/// are interpreted.
#[cfg(not(target_arch = "aarch64"))]
mod host {
    use core::fmt;

    use memory_addr::PhysAddr;
    use page_table_entry::{GenericPTE, MappingFlags};

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct DescriptorAttr: u64 {
            const VALID =       1 << 0;
            /// Page (or table) descriptor rather than a block.
            const NON_BLOCK =   1 << 1;
            /// Accessible at EL0.
            const AP_EL0 =      1 << 6;
            const AP_RO =       1 << 7;
            /// Access flag.
            const AF =          1 << 10;
        }
    }

    impl DescriptorAttr {
        fn from_flags(flags: MappingFlags, is_huge: bool) -> Self {
            let mut attr = Self::AF;
            if flags.contains(MappingFlags::READ) {
                attr |= Self::VALID;
            }
            if !flags.contains(MappingFlags::WRITE) {
                attr |= Self::AP_RO;
            }
            if flags.contains(MappingFlags::USER) {
                attr |= Self::AP_EL0;
            }
            if !is_huge {
                attr |= Self::NON_BLOCK;
            }
            attr
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct HostPTE(u64);

    impl HostPTE {
        const PHYS_ADDR_MASK: u64 = 0x0000_ffff_ffff_f000; // bits 12..48

        pub const fn from_bits(bits: u64) -> Self {
            Self(bits)
        }

        pub const fn empty() -> Self {
            Self(0)
        }

        fn attr(&self) -> DescriptorAttr {
            DescriptorAttr::from_bits_truncate(self.0)
        }
    }

    impl GenericPTE for HostPTE {
        fn new_page(paddr: PhysAddr, flags: MappingFlags, is_huge: bool) -> Self {
            let attr = DescriptorAttr::from_flags(flags, is_huge);
            Self(attr.bits() | (paddr.as_usize() as u64 & Self::PHYS_ADDR_MASK))
        }

        fn new_table(paddr: PhysAddr) -> Self {
            let attr = DescriptorAttr::VALID | DescriptorAttr::NON_BLOCK;
            Self(attr.bits() | (paddr.as_usize() as u64 & Self::PHYS_ADDR_MASK))
        }

        fn paddr(&self) -> PhysAddr {
            PhysAddr::from((self.0 & Self::PHYS_ADDR_MASK) as usize)
        }

        fn flags(&self) -> MappingFlags {
            let attr = self.attr();
            if !attr.contains(DescriptorAttr::VALID) {
                return MappingFlags::empty();
            }
            let mut flags = MappingFlags::READ;
            if !attr.contains(DescriptorAttr::AP_RO) {
                flags |= MappingFlags::WRITE;
            }
            if attr.contains(DescriptorAttr::AP_EL0) {
                flags |= MappingFlags::USER;
            }
            flags
        }

        fn set_paddr(&mut self, paddr: PhysAddr) {
            self.0 = (self.0 & !Self::PHYS_ADDR_MASK) | (paddr.as_usize() as u64 & Self::PHYS_ADDR_MASK);
        }

        fn set_flags(&mut self, flags: MappingFlags, is_huge: bool) {
            self.0 = (self.0 & Self::PHYS_ADDR_MASK) | DescriptorAttr::from_flags(flags, is_huge).bits();
        }

        fn bits(self) -> usize {
            self.0 as usize
        }

        fn is_unused(&self) -> bool {
            self.0 == 0
        }

        fn is_present(&self) -> bool {
            self.attr().contains(DescriptorAttr::VALID)
        }

        fn is_huge(&self) -> bool {
            !self.attr().contains(DescriptorAttr::NON_BLOCK)
        }

        fn clear(&mut self) {
            self.0 = 0;
        }
    }

    impl fmt::Debug for HostPTE {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("HostPTE")
                .field("raw", &self.0)
                .field("paddr", &self.paddr())
                .field("attr", &self.attr())
                .finish()
        }
    }
}

/// Physical page descriptor owned by the page allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Page frame number.
    pub frame: usize,
    /// Number of mappings referencing this page.
    pub ref_count: usize,
}

/// Read-only queries against an address space.
///
/// Implementations must not create or modify mappings.
pub trait AddressSpace {
    /// Returns the last-level entry for `vaddr`, without allocating missing
    /// intermediate tables.
    fn lookup_entry(&self, vaddr: VirtAddr) -> Option<PageTableEntry>;

    /// Returns the page mapped at `vaddr` together with its entry.
    fn lookup_page(&self, vaddr: VirtAddr) -> Option<(PageInfo, PageTableEntry)>;

    /// Physical address of the first byte of `page`.
    fn page_to_phys(&self, page: &PageInfo) -> PhysAddr;
}

/// One virtual-to-physical translation, produced for printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub vaddr: VirtAddr,
    pub paddr: PhysAddr,
    pub ref_count: usize,
    pub writable: bool,
    pub user: bool,
}

/// Translates `vaddr`, or returns `None` if no physical page backs it.
pub fn translate<A: AddressSpace + ?Sized>(space: &A, vaddr: VirtAddr) -> Option<Translation> {
    space.lookup_entry(vaddr)?;
    let (page, entry) = space.lookup_page(vaddr)?;
    Some(Translation {
        vaddr,
        paddr: space.page_to_phys(&page),
        ref_count: page.ref_count,
        writable: entry.is_writable(),
        user: entry.is_user_accessible(),
    })
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VA: {:#0w$x}, PA: {:#0w$x}, pp_ref: {}, PTE_W: {}, PTE_U: {}",
            self.vaddr.as_usize(),
            self.paddr.as_usize(),
            self.ref_count,
            self.writable as u8,
            self.user as u8,
            w = ADDR_WIDTH,
        )
    }
}
