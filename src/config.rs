// Copyright (c) 2025 - Cowboy AI, Inc.
//! Synthesis Configuration
//!
//! The full set of high-level inputs a synthesis pass consumes. A default
//! configuration carries no subnet plan and synthesizes to an empty graph;
//! [`SynthesisConfig::demo`] reproduces the routing-demo topology in either
//! routing mode.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::{CidrBlock, InstanceSize, MachineImage, RoutingMode, SubnetTier};

/// One entry of the subnet plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetSpec {
    /// Logical group name, unique within the plan
    pub name: String,
    /// Visibility tier, determines default routing
    pub tier: SubnetTier,
    /// Mask width of the group's address range
    pub mask_width: u8,
}

impl SubnetSpec {
    pub fn new(name: impl Into<String>, tier: SubnetTier, mask_width: u8) -> Self {
        Self {
            name: name.into(),
            tier,
            mask_width,
        }
    }
}

/// Configuration of a synthesis pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Target region identifier
    pub region: String,

    /// Parent address block subnets are carved from
    pub cidr: CidrBlock,

    /// Number of availability zones to span
    pub az_count: u32,

    /// Number of NAT gateways serving routable-private groups
    pub nat_gateways: u32,

    /// Subnet groups to carve, in allocation order. An empty plan produces
    /// an empty graph.
    pub subnet_plan: Vec<SubnetSpec>,

    /// Appliance variant: isolated, or routable with forwarding enabled
    pub routing_mode: RoutingMode,

    /// Size class applied to all instances
    pub instance_size: InstanceSize,

    /// Machine image applied to all instances
    pub machine_image: MachineImage,

    /// Local directory holding the static site bundle for the application
    pub asset_path: PathBuf,

    /// Name of the subnet group hosting the application node
    pub application_group: String,

    /// Name of the subnet group hosting the appliance node
    pub appliance_group: String,

    /// Attach a broad operational-access policy to both private nodes for
    /// out-of-band inspection
    pub operational_access: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            region: "us-west-2".to_string(),
            cidr: "10.0.0.0/16".parse().expect("valid default CIDR"),
            az_count: 1,
            nat_gateways: 1,
            subnet_plan: Vec::new(),
            routing_mode: RoutingMode::Isolated,
            instance_size: InstanceSize::Nano,
            machine_image: MachineImage::default(),
            asset_path: PathBuf::from("html"),
            application_group: "application".to_string(),
            appliance_group: "appliance".to_string(),
            operational_access: false,
        }
    }
}

impl SynthesisConfig {
    /// The routing-demo topology: one public group for the bastion and two
    /// private groups, with the appliance group's tier matching the mode
    pub fn demo(routing_mode: RoutingMode) -> Self {
        Self {
            subnet_plan: vec![
                SubnetSpec::new("bastion", SubnetTier::Public, 24),
                SubnetSpec::new("application", SubnetTier::RoutablePrivate, 24),
                SubnetSpec::new("appliance", routing_mode.required_appliance_tier(), 24),
            ],
            routing_mode,
            ..Self::default()
        }
    }

    /// Whether the configuration produces any resources at all
    pub fn is_empty(&self) -> bool {
        self.subnet_plan.is_empty()
    }

    /// Look up a plan entry by group name
    pub fn find_group(&self, name: &str) -> Option<&SubnetSpec> {
        self.subnet_plan.iter().find(|spec| spec.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = SynthesisConfig::default();
        assert!(config.is_empty());
        assert_eq!(config.cidr.to_string(), "10.0.0.0/16");
        assert_eq!(config.az_count, 1);
        assert_eq!(config.nat_gateways, 1);
    }

    #[test]
    fn test_demo_config_isolated() {
        let config = SynthesisConfig::demo(RoutingMode::Isolated);
        assert_eq!(config.subnet_plan.len(), 3);
        assert_eq!(
            config.find_group("appliance").unwrap().tier,
            SubnetTier::IsolatedPrivate
        );
    }

    #[test]
    fn test_demo_config_forwarding() {
        let config = SynthesisConfig::demo(RoutingMode::Forwarding);
        assert_eq!(
            config.find_group("appliance").unwrap().tier,
            SubnetTier::RoutablePrivate
        );
        assert_eq!(
            config.find_group("bastion").unwrap().tier,
            SubnetTier::Public
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SynthesisConfig = serde_json::from_str(
            r#"{
                "cidr": "172.16.0.0/16",
                "routing_mode": "forwarding",
                "subnet_plan": [
                    {"name": "edge", "tier": "public", "mask_width": 24}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.cidr.to_string(), "172.16.0.0/16");
        assert_eq!(config.routing_mode, RoutingMode::Forwarding);
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.subnet_plan[0].name, "edge");
    }
}
