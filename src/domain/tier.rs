// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet Visibility Tiers and Routing Modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility tier of a subnet group
///
/// The tier determines default routing for instances placed in the group:
/// - `Public`: reachable from the internet, internet-bound route installed
/// - `RoutablePrivate`: no inbound exposure, outbound egress via a NAT gateway
/// - `IsolatedPrivate`: no route to a NAT or internet gateway at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetTier {
    Public,
    RoutablePrivate,
    IsolatedPrivate,
}

impl SubnetTier {
    /// Check if instances in this tier are internet-reachable
    pub fn is_public(&self) -> bool {
        matches!(self, SubnetTier::Public)
    }

    /// Check if this is one of the private tiers
    pub fn is_private(&self) -> bool {
        !self.is_public()
    }

    /// Check if the tier gets an internet-bound default route
    pub fn has_internet_route(&self) -> bool {
        matches!(self, SubnetTier::Public)
    }

    /// Check if instances can initiate outbound traffic (directly or via NAT)
    pub fn has_egress_route(&self) -> bool {
        matches!(self, SubnetTier::Public | SubnetTier::RoutablePrivate)
    }
}

impl fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetTier::Public => write!(f, "public"),
            SubnetTier::RoutablePrivate => write!(f, "routable-private"),
            SubnetTier::IsolatedPrivate => write!(f, "isolated-private"),
        }
    }
}

/// Routing mode of the appliance side of the topology
///
/// Selects between the two demo variants: an appliance cut off in an
/// isolated subnet, or an appliance in a routable subnet actively relaying
/// transit traffic with kernel forwarding enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingMode {
    Isolated,
    Forwarding,
}

impl RoutingMode {
    /// Tier the appliance subnet group must have under this mode
    pub fn required_appliance_tier(&self) -> SubnetTier {
        match self {
            RoutingMode::Isolated => SubnetTier::IsolatedPrivate,
            RoutingMode::Forwarding => SubnetTier::RoutablePrivate,
        }
    }

    /// Whether the appliance keeps its source/destination address check
    ///
    /// Relaying traffic not addressed to the node itself requires the check
    /// to be disabled.
    pub fn source_dest_check(&self) -> bool {
        matches!(self, RoutingMode::Isolated)
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingMode::Isolated => write!(f, "isolated"),
            RoutingMode::Forwarding => write!(f, "forwarding"),
        }
    }
}
