// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Graph Arena
//!
//! The declarative output of a synthesis pass. Resources are a closed set of
//! tagged variants held in a flat, insertion-ordered arena; every
//! cross-resource reference is a [`ResourceId`] resolved against the arena,
//! never a live pointer, so cyclic ownership is impossible.
//!
//! Insertion enforces dependency order: a resource may only reference
//! identifiers already present in the graph. A consuming provisioning engine
//! can therefore resolve references in a single forward pass.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

use crate::domain::{
    BootstrapScript, CidrBlock, InstanceSize, MachineImage, Protocol, SubnetTier,
};

/// Graph construction error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Invalid resource identifier: {0:?}")]
    InvalidId(String),

    #[error("Duplicate resource identifier: {0}")]
    DuplicateId(ResourceId),

    #[error("Resource {resource} references undeclared resource {reference}")]
    UnresolvedReference {
        resource: ResourceId,
        reference: ResourceId,
    },
}

/// Identifier of a resource within a graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Create a new resource identifier
    ///
    /// # Invariants
    /// - Identifier must not be empty
    pub fn new(id: impl Into<String>) -> Result<Self, GraphError> {
        let id = id.into();
        if id.is_empty() {
            return Err(GraphError::InvalidId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access conferred by a [`Resource::Grant`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "access", rename_all = "kebab-case")]
pub enum GrantAccess {
    /// Read access to a published asset
    AssetRead { url: String },
    /// Write access to a published asset
    AssetWrite { url: String },
    /// Broad operational access (telemetry / session-manager style)
    Operational { actions: Vec<String> },
}

/// A resource declaration
///
/// Closed set of kinds; plain records only. Serialization dispatches on the
/// `kind` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Resource {
    /// Parent address range the whole topology lives in
    NetworkBlock {
        cidr: CidrBlock,
        az_count: u32,
        nat_gateways: u32,
        region: String,
    },

    /// Named partition of the network block with a visibility tier
    SubnetGroup {
        name: String,
        tier: SubnetTier,
        cidr: CidrBlock,
        network: ResourceId,
    },

    /// First-boot shell directives for a compute node
    BootstrapScript { script: BootstrapScript },

    /// Role assumable by a service principal
    IdentityRole { name: String, assumed_by: String },

    /// Additive permission attached to an identity role
    Grant {
        role: ResourceId,
        #[serde(flatten)]
        access: GrantAccess,
    },

    /// Provisioned instance placed in a subnet group
    ComputeNode {
        name: String,
        subnet_group: ResourceId,
        machine_image: MachineImage,
        size: InstanceSize,
        /// When enabled, traffic not addressed to/from this node is dropped.
        /// Must be disabled for the node to forward transit traffic.
        source_dest_check: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        bootstrap: Option<ResourceId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<ResourceId>,
    },

    /// Directed permission: source security identity -> target port/protocol
    SecurityRule {
        target: ResourceId,
        source: ResourceId,
        protocol: Protocol,
        port: u16,
        description: String,
    },
}

impl Resource {
    /// Short name of the resource kind
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::NetworkBlock { .. } => "network-block",
            Resource::SubnetGroup { .. } => "subnet-group",
            Resource::BootstrapScript { .. } => "bootstrap-script",
            Resource::IdentityRole { .. } => "identity-role",
            Resource::Grant { .. } => "grant",
            Resource::ComputeNode { .. } => "compute-node",
            Resource::SecurityRule { .. } => "security-rule",
        }
    }

    /// All identifiers this resource references
    pub fn references(&self) -> Vec<&ResourceId> {
        match self {
            Resource::NetworkBlock { .. }
            | Resource::BootstrapScript { .. }
            | Resource::IdentityRole { .. } => Vec::new(),
            Resource::SubnetGroup { network, .. } => vec![network],
            Resource::Grant { role, .. } => vec![role],
            Resource::ComputeNode {
                subnet_group,
                bootstrap,
                role,
                ..
            } => {
                let mut refs = vec![subnet_group];
                refs.extend(bootstrap.iter());
                refs.extend(role.iter());
                refs
            }
            Resource::SecurityRule { target, source, .. } => vec![target, source],
        }
    }
}

/// Insertion-ordered arena of resource declarations plus named outputs
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceGraph {
    resources: Vec<ResourceEntry>,
    #[serde(skip)]
    index: HashMap<ResourceId, usize>,
    outputs: BTreeMap<String, String>,
}

/// A resource together with its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceEntry {
    pub id: ResourceId,
    #[serde(flatten)]
    pub resource: Resource,
}

impl ResourceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource
    ///
    /// # Invariants
    /// - Identifier must not already be declared
    /// - Every reference must resolve to an already-declared resource
    pub fn insert(&mut self, id: ResourceId, resource: Resource) -> Result<(), GraphError> {
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }

        for reference in resource.references() {
            if !self.index.contains_key(reference) {
                return Err(GraphError::UnresolvedReference {
                    resource: id,
                    reference: reference.clone(),
                });
            }
        }

        self.index.insert(id.clone(), self.resources.len());
        self.resources.push(ResourceEntry { id, resource });
        Ok(())
    }

    /// Look up a resource by identifier
    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.index.get(id).map(|&i| &self.resources[i].resource)
    }

    /// Check whether an identifier is declared
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate resources in declaration (dependency) order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources.iter()
    }

    /// Number of declared resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Expose a named output value
    pub fn set_output(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.outputs.insert(name.into(), value.into());
    }

    /// Named outputs of the graph
    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    /// Emit the graph as a JSON document
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Emit the graph as pretty-printed JSON text
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// Structural equality: declaration order, properties and outputs. The index
// is derived state and excluded.
impl PartialEq for ResourceGraph {
    fn eq(&self, other: &Self) -> bool {
        self.resources == other.resources && self.outputs == other.outputs
    }
}

impl Eq for ResourceGraph {}
