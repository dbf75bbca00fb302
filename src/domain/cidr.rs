// Copyright (c) 2025 - Cowboy AI, Inc.
//! CIDR Address Blocks and Sequential Subnet Allocation
//!
//! [`CidrBlock`] is the address-range value object every network resource is
//! expressed in terms of. [`SubnetAllocator`] carves a parent block into
//! child blocks by walking the address space sequentially, which is what
//! makes subnet layout deterministic: the same plan against the same parent
//! always yields the same ranges, and two allocations can never overlap.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// CIDR validation and allocation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CidrError {
    #[error("Invalid CIDR notation: {0}")]
    InvalidNotation(String),

    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    #[error("Invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("Address {address} has host bits set for prefix /{prefix_len}")]
    HostBitsSet { address: Ipv4Addr, prefix_len: u8 },

    #[error("Requested mask /{requested} is wider than parent block {parent}")]
    MaskTooWide { requested: u8, parent: CidrBlock },

    #[error("Address space exhausted: /{requested} does not fit in {parent}")]
    Exhausted { requested: u8, parent: CidrBlock },
}

/// IPv4 address block in CIDR notation value object
///
/// Invariants:
/// - Prefix length 0-32
/// - The address is the network address (no host bits set)
///
/// # Examples
///
/// ```rust
/// use topology_synth::domain::CidrBlock;
///
/// let block: CidrBlock = "10.0.0.0/16".parse().unwrap();
/// assert_eq!(block.prefix_len(), 16);
/// assert_eq!(block.to_string(), "10.0.0.0/16");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidrBlock {
    address: Ipv4Addr,
    prefix_len: u8,
}

impl CidrBlock {
    /// Create a new CIDR block with validation
    ///
    /// # Invariants
    /// - Prefix length must be 0-32
    /// - Host bits must be zero ("10.0.0.1/16" is rejected)
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Result<Self, CidrError> {
        if prefix_len > 32 {
            return Err(CidrError::InvalidPrefixLength(prefix_len));
        }

        let raw = u32::from(address);
        if raw & !Self::mask(prefix_len) != 0 {
            return Err(CidrError::HostBitsSet { address, prefix_len });
        }

        Ok(Self { address, prefix_len })
    }

    fn mask(prefix_len: u8) -> u32 {
        if prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - prefix_len)
        }
    }

    /// Get the network address
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Get the prefix length
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// First address of the block as a raw integer
    pub(crate) fn first_u32(&self) -> u32 {
        u32::from(self.address)
    }

    /// Last address of the block as a raw integer
    pub(crate) fn last_u32(&self) -> u32 {
        u32::from(self.address) | !Self::mask(self.prefix_len)
    }

    /// Number of addresses covered by this block
    pub fn host_capacity(&self) -> u64 {
        1u64 << (32 - self.prefix_len)
    }

    /// Check whether `other` lies entirely within this block
    pub fn contains(&self, other: &CidrBlock) -> bool {
        self.first_u32() <= other.first_u32() && other.last_u32() <= self.last_u32()
    }

    /// Check whether the two blocks share any address
    pub fn overlaps(&self, other: &CidrBlock) -> bool {
        self.first_u32() <= other.last_u32() && other.first_u32() <= self.last_u32()
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for CidrBlock {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, prefix_str) = s
            .split_once('/')
            .ok_or_else(|| CidrError::InvalidNotation(s.to_string()))?;

        let address = Ipv4Addr::from_str(addr_str)
            .map_err(|_| CidrError::InvalidAddress(addr_str.to_string()))?;

        let prefix_len = prefix_str
            .parse::<u8>()
            .map_err(|_| CidrError::InvalidNotation(s.to_string()))?;

        Self::new(address, prefix_len)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Sequential allocator over a parent [`CidrBlock`]
///
/// Hands out child blocks in request order, consuming the parent's address
/// space front to back. Each allocation is aligned to its own block size, so
/// every child is a valid CIDR range and no two children overlap.
///
/// # Examples
///
/// ```rust
/// use topology_synth::domain::{CidrBlock, SubnetAllocator};
///
/// let parent: CidrBlock = "10.0.0.0/16".parse().unwrap();
/// let mut alloc = SubnetAllocator::new(parent);
/// assert_eq!(alloc.allocate(24).unwrap().to_string(), "10.0.0.0/24");
/// assert_eq!(alloc.allocate(24).unwrap().to_string(), "10.0.1.0/24");
/// ```
#[derive(Debug, Clone)]
pub struct SubnetAllocator {
    parent: CidrBlock,
    /// Next unallocated address, relative offset from the parent start.
    cursor: u64,
}

impl SubnetAllocator {
    /// Create an allocator over the given parent block
    pub fn new(parent: CidrBlock) -> Self {
        Self { parent, cursor: 0 }
    }

    /// Get the parent block
    pub fn parent(&self) -> CidrBlock {
        self.parent
    }

    /// Allocate the next child block with the given mask width
    ///
    /// Fails fast when the request is wider than the parent or when the
    /// remaining address space cannot hold it.
    pub fn allocate(&mut self, mask_width: u8) -> Result<CidrBlock, CidrError> {
        if mask_width > 32 {
            return Err(CidrError::InvalidPrefixLength(mask_width));
        }
        if mask_width < self.parent.prefix_len() {
            return Err(CidrError::MaskTooWide {
                requested: mask_width,
                parent: self.parent,
            });
        }

        let size = 1u64 << (32 - mask_width);

        // Align the cursor up to the child's block size. The parent start is
        // itself aligned to a larger power of two, so absolute alignment
        // follows from relative alignment.
        let start = self.cursor.div_ceil(size) * size;

        if start + size > self.parent.host_capacity() {
            return Err(CidrError::Exhausted {
                requested: mask_width,
                parent: self.parent,
            });
        }

        self.cursor = start + size;

        let address = Ipv4Addr::from(self.parent.first_u32() + start as u32);
        CidrBlock::new(address, mask_width)
    }
}
