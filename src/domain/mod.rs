// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Value objects for network-topology synthesis. All are immutable and
//! validated on construction.
//!
//! # Value Objects with Invariants
//!
//! - [`CidrBlock`] - IPv4 address range with CIDR notation
//! - [`SubnetAllocator`] - deterministic sequential subnet carving
//! - [`SubnetTier`] - public / routable-private / isolated-private
//! - [`RoutingMode`] - isolated vs forwarding appliance variant
//! - [`InstanceSize`] - compute node size classes
//! - [`MachineImage`] - opaque machine image reference
//! - [`BootstrapScript`] - ordered first-boot shell directives

pub mod bootstrap;
pub mod cidr;
pub mod instance;
pub mod tier;

// Re-export value objects
pub use bootstrap::BootstrapScript;
pub use cidr::{CidrBlock, CidrError, SubnetAllocator};
pub use instance::{InstanceError, InstanceSize, MachineImage, Protocol};
pub use tier::{RoutingMode, SubnetTier};
