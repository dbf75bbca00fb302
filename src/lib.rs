//! Declarative network-topology synthesis for the specific-routing demo
//! environments.
//!
//! A single synthesis pass turns a [`SynthesisConfig`] (address block,
//! subnet plan, routing mode, instance sizing) into a closed
//! [`ResourceGraph`]: a virtual network with one public and two private
//! subnet groups, a bastion host, an application node serving a published
//! site bundle, and an appliance node optionally configured to forward
//! transit traffic. The graph is a static description consumed by an
//! external provisioning engine.

pub mod assets;
pub mod config;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod synthesis;

// Re-export commonly used types
pub use assets::{AssetPublisher, PublishedAsset, StaticAssetPublisher};
pub use config::{SubnetSpec, SynthesisConfig};
pub use domain::{BootstrapScript, CidrBlock, InstanceSize, MachineImage, RoutingMode, SubnetTier};
pub use errors::{ConfigurationError, SynthesisError, SynthesisResult};
pub use graph::{GrantAccess, GraphError, Resource, ResourceGraph, ResourceId};
pub use synthesis::{synthesize, synthesize_with};
