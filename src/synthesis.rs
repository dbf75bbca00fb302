// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Synthesizer
//!
//! Single-threaded, side-effect-free transformation: configuration in,
//! resource graph out. Declarations are emitted in dependency order (network
//! block, subnet groups, nodes, cross-references) so a consuming
//! provisioning engine never sees a forward reference.
//!
//! Construction is all-or-nothing: every configuration check and the whole
//! subnet allocation run before the first resource is declared, so a failed
//! pass emits nothing.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::assets::{AssetPublisher, StaticAssetPublisher};
use crate::config::{SubnetSpec, SynthesisConfig};
use crate::domain::{BootstrapScript, CidrBlock, Protocol, RoutingMode, SubnetAllocator};
use crate::errors::{ConfigurationError, SynthesisResult};
use crate::graph::{GrantAccess, Resource, ResourceGraph, ResourceId};

/// Service principal allowed to assume instance roles
const COMPUTE_PRINCIPAL: &str = "ec2.amazonaws.com";

/// Telemetry / session-manager style actions for out-of-band inspection
const OPERATIONAL_ACTIONS: [&str; 3] = [
    "ssmmessages:*",
    "ssm:UpdateInstanceInformation",
    "ec2messages:*",
];

/// Synthesize a resource graph with the default asset publisher
pub fn synthesize(config: &SynthesisConfig) -> SynthesisResult<ResourceGraph> {
    synthesize_with(config, &StaticAssetPublisher::default())
}

/// Synthesize a resource graph, publishing the bootstrap asset through the
/// given publisher
pub fn synthesize_with(
    config: &SynthesisConfig,
    assets: &dyn AssetPublisher,
) -> SynthesisResult<ResourceGraph> {
    if config.is_empty() {
        info!("subnet plan is empty, synthesizing empty graph");
        return Ok(ResourceGraph::new());
    }

    // Validate the whole configuration and carve the address space before
    // declaring anything. Partial graphs are not a valid output.
    let placement = validate_placement(config)?;
    let subnets = allocate_subnets(config)?;
    let asset = assets.publish(&config.asset_path)?;

    let mut graph = ResourceGraph::new();

    // Network block first, then subnet groups in plan order.
    let network = declare(
        &mut graph,
        "network",
        Resource::NetworkBlock {
            cidr: config.cidr,
            az_count: config.az_count,
            nat_gateways: config.nat_gateways,
            region: config.region.clone(),
        },
    )?;

    let mut group_ids = Vec::with_capacity(subnets.len());
    for (spec, cidr) in &subnets {
        let id = declare(
            &mut graph,
            format!("subnet-{}", spec.name),
            Resource::SubnetGroup {
                name: spec.name.clone(),
                tier: spec.tier,
                cidr: *cidr,
                network: network.clone(),
            },
        )?;
        group_ids.push((spec.name.clone(), id));
    }

    let group_id = |name: &str| -> ResourceId {
        group_ids
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| id.clone())
            .expect("placement validated against plan")
    };

    // Bastion host in the sole public group. Its identifier doubles as the
    // security identity the application rule references.
    let bastion = declare(
        &mut graph,
        "bastion-host",
        Resource::ComputeNode {
            name: "bastion-host".to_string(),
            subnet_group: group_id(&placement.public),
            machine_image: config.machine_image.clone(),
            size: config.instance_size,
            source_dest_check: true,
            bootstrap: None,
            role: None,
        },
    )?;

    // Application side: role, asset grant and bootstrap are declared before
    // the node that attaches them.
    let application_role = declare(
        &mut graph,
        "application-role",
        Resource::IdentityRole {
            name: "application-role".to_string(),
            assumed_by: COMPUTE_PRINCIPAL.to_string(),
        },
    )?;

    declare(
        &mut graph,
        "application-asset-read",
        Resource::Grant {
            role: application_role.clone(),
            access: GrantAccess::AssetRead {
                url: asset.url.clone(),
            },
        },
    )?;

    let application_bootstrap = declare(
        &mut graph,
        "application-bootstrap",
        Resource::BootstrapScript {
            script: web_server_script(&asset.url),
        },
    )?;

    let application = declare(
        &mut graph,
        "application",
        Resource::ComputeNode {
            name: "application".to_string(),
            subnet_group: group_id(&placement.application),
            machine_image: config.machine_image.clone(),
            size: config.instance_size,
            source_dest_check: true,
            bootstrap: Some(application_bootstrap),
            role: Some(application_role.clone()),
        },
    )?;

    declare(
        &mut graph,
        "application-http-from-bastion",
        Resource::SecurityRule {
            target: application.clone(),
            source: bastion,
            protocol: Protocol::Tcp,
            port: 80,
            description: "Allows HTTP connection from bastion security group".to_string(),
        },
    )?;

    // Appliance side. Forwarding mode disables the address check and enables
    // kernel forwarding at first boot; isolated mode does neither.
    let appliance_role = if config.operational_access {
        Some(declare(
            &mut graph,
            "appliance-role",
            Resource::IdentityRole {
                name: "appliance-role".to_string(),
                assumed_by: COMPUTE_PRINCIPAL.to_string(),
            },
        )?)
    } else {
        None
    };

    let appliance_bootstrap = match config.routing_mode {
        RoutingMode::Forwarding => Some(declare(
            &mut graph,
            "appliance-bootstrap",
            Resource::BootstrapScript {
                script: ip_forwarding_script(),
            },
        )?),
        RoutingMode::Isolated => None,
    };

    declare(
        &mut graph,
        "appliance",
        Resource::ComputeNode {
            name: "appliance".to_string(),
            subnet_group: group_id(&placement.appliance),
            machine_image: config.machine_image.clone(),
            size: config.instance_size,
            source_dest_check: config.routing_mode.source_dest_check(),
            bootstrap: appliance_bootstrap,
            role: appliance_role.clone(),
        },
    )?;

    if config.operational_access {
        declare(
            &mut graph,
            "application-operational-access",
            Resource::Grant {
                role: application_role,
                access: operational_access(),
            },
        )?;
        if let Some(role) = appliance_role {
            declare(
                &mut graph,
                "appliance-operational-access",
                Resource::Grant {
                    role,
                    access: operational_access(),
                },
            )?;
        }
    }

    graph.set_output("network-block-id", network.as_str());

    info!(
        resources = graph.len(),
        routing_mode = %config.routing_mode,
        "synthesized topology"
    );

    Ok(graph)
}

/// Resolved node placements, by subnet group name
#[derive(Debug)]
struct Placement {
    public: String,
    application: String,
    appliance: String,
}

fn validate_placement(config: &SynthesisConfig) -> Result<Placement, ConfigurationError> {
    let mut seen = HashSet::new();
    for spec in &config.subnet_plan {
        if !seen.insert(spec.name.as_str()) {
            return Err(ConfigurationError::DuplicateGroupName(spec.name.clone()));
        }
    }

    let publics: Vec<&SubnetSpec> = config
        .subnet_plan
        .iter()
        .filter(|spec| spec.tier.is_public())
        .collect();
    let public = match publics.as_slice() {
        [] => return Err(ConfigurationError::MissingPublicGroup),
        [only] => only.name.clone(),
        many => return Err(ConfigurationError::MultiplePublicGroups(many.len())),
    };

    let application = private_group(config, &config.application_group)?;
    let appliance = private_group(config, &config.appliance_group)?;
    if application.name == appliance.name {
        return Err(ConfigurationError::PlacementConflict(
            application.name.clone(),
        ));
    }

    let required = config.routing_mode.required_appliance_tier();
    if appliance.tier != required {
        return Err(ConfigurationError::TierMismatch {
            name: appliance.name.clone(),
            tier: appliance.tier.to_string(),
            mode: config.routing_mode.to_string(),
            required: required.to_string(),
        });
    }

    Ok(Placement {
        public,
        application: application.name.clone(),
        appliance: appliance.name.clone(),
    })
}

fn private_group<'a>(
    config: &'a SynthesisConfig,
    name: &str,
) -> Result<&'a SubnetSpec, ConfigurationError> {
    let spec = config
        .find_group(name)
        .ok_or_else(|| ConfigurationError::UnknownGroup(name.to_string()))?;
    if !spec.tier.is_private() {
        return Err(ConfigurationError::GroupNotPrivate {
            name: spec.name.clone(),
            tier: spec.tier.to_string(),
        });
    }
    Ok(spec)
}

/// Carve the plan out of the parent block, in plan order
fn allocate_subnets(
    config: &SynthesisConfig,
) -> Result<Vec<(&SubnetSpec, CidrBlock)>, ConfigurationError> {
    let mut allocator = SubnetAllocator::new(config.cidr);
    let mut subnets = Vec::with_capacity(config.subnet_plan.len());
    for spec in &config.subnet_plan {
        let cidr = allocator.allocate(spec.mask_width)?;
        subnets.push((spec, cidr));
    }
    Ok(subnets)
}

/// Install and start a web server, fetch the published site bundle, keep the
/// stock index page under `.orig` and overlay the new content without
/// clobbering it
fn web_server_script(asset_url: &str) -> BootstrapScript {
    let mut script = BootstrapScript::for_linux();
    script.add_commands([
        "amazon-linux-extras install nginx1 -y".to_string(),
        "systemctl enable nginx.service".to_string(),
        "systemctl start nginx.service".to_string(),
    ]);
    script.add_commands([
        format!("aws s3 cp {asset_url} ."),
        "unzip *.zip".to_string(),
        "/bin/mv /usr/share/nginx/html/index.html /usr/share/nginx/html/index.html.orig"
            .to_string(),
        "/bin/cp -r -n index.html carousel.css /usr/share/nginx/html/".to_string(),
    ]);
    script
}

/// Enable kernel IPv4 and IPv6 forwarding for transit traffic
fn ip_forwarding_script() -> BootstrapScript {
    let mut script = BootstrapScript::for_linux();
    script.add_commands([
        "sysctl -w net.ipv4.ip_forward=1",
        "sysctl -w net.ipv6.conf.all.forwarding=1",
    ]);
    script
}

fn operational_access() -> GrantAccess {
    GrantAccess::Operational {
        actions: OPERATIONAL_ACTIONS.iter().map(ToString::to_string).collect(),
    }
}

fn declare(
    graph: &mut ResourceGraph,
    id: impl Into<String>,
    resource: Resource,
) -> SynthesisResult<ResourceId> {
    let id = ResourceId::new(id)?;
    debug!(id = %id, kind = resource.kind(), "declared resource");
    graph.insert(id.clone(), resource)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_server_script_shape() {
        let script = web_server_script("https://assets.demo.internal/html.zip");

        assert!(script.contains("nginx"));
        assert!(script.contains("aws s3 cp https://assets.demo.internal/html.zip"));
        assert!(script.contains("unzip"));
        assert!(script.contains("index.html.orig"));
        assert!(script.contains("cp -r -n"));
    }

    #[test]
    fn test_ip_forwarding_script_covers_both_families() {
        let script = ip_forwarding_script();
        assert!(script.contains("net.ipv4.ip_forward=1"));
        assert!(script.contains("net.ipv6.conf.all.forwarding=1"));
    }

    #[test]
    fn test_validate_placement_rejects_missing_public_group() {
        let mut config = SynthesisConfig::demo(RoutingMode::Isolated);
        config.subnet_plan.remove(0);

        let err = validate_placement(&config).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingPublicGroup);
    }

    #[test]
    fn test_validate_placement_rejects_shared_group() {
        let mut config = SynthesisConfig::demo(RoutingMode::Isolated);
        config.appliance_group = "application".to_string();

        let err = validate_placement(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::PlacementConflict("application".to_string())
        );
    }

    #[test]
    fn test_validate_placement_rejects_unknown_group() {
        let mut config = SynthesisConfig::demo(RoutingMode::Isolated);
        config.application_group = "missing".to_string();

        let err = validate_placement(&config).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownGroup("missing".to_string()));
    }

    #[test]
    fn test_validate_placement_rejects_tier_mode_mismatch() {
        let mut config = SynthesisConfig::demo(RoutingMode::Isolated);
        config.routing_mode = RoutingMode::Forwarding;

        let err = validate_placement(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::TierMismatch { .. }));
    }
}
