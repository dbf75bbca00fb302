//! Error types for topology synthesis
//!
//! Two terminal classes: configuration errors (the input cannot describe a
//! valid topology) and reference errors (a declaration referenced an
//! undeclared identity). Neither is recoverable within a pass; the caller
//! must re-invoke with corrected configuration.

use thiserror::Error;

use crate::assets::AssetError;
use crate::domain::CidrError;
use crate::graph::GraphError;

/// Errors that abort a synthesis pass
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// The configuration cannot describe a valid topology
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A declaration referenced an identity not yet declared
    #[error("Reference error: {0}")]
    Reference(#[from] GraphError),
}

/// Configuration problems surfaced before any resource is emitted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Malformed address block or a subnet plan that does not fit it
    #[error("Invalid subnet addressing: {0}")]
    Cidr(#[from] CidrError),

    /// The bootstrap asset bundle cannot be published
    #[error("Invalid bootstrap asset: {0}")]
    Asset(#[from] AssetError),

    #[error("Subnet plan declares no public subnet group")]
    MissingPublicGroup,

    #[error("Subnet plan declares {0} public subnet groups, expected exactly one")]
    MultiplePublicGroups(usize),

    #[error("Duplicate subnet group name in plan: {0}")]
    DuplicateGroupName(String),

    #[error("Subnet group name does not appear in the plan: {0}")]
    UnknownGroup(String),

    #[error("Subnet group {name} has tier {tier}, but instance placement requires a private tier")]
    GroupNotPrivate { name: String, tier: String },

    #[error("Application and appliance cannot share subnet group {0}")]
    PlacementConflict(String),

    #[error("Appliance group {name} has tier {tier}, but routing mode {mode} requires {required}")]
    TierMismatch {
        name: String,
        tier: String,
        mode: String,
        required: String,
    },
}

/// Result type for synthesis operations
pub type SynthesisResult<T> = Result<T, SynthesisError>;

impl From<CidrError> for SynthesisError {
    fn from(err: CidrError) -> Self {
        SynthesisError::Configuration(ConfigurationError::Cidr(err))
    }
}

impl From<AssetError> for SynthesisError {
    fn from(err: AssetError) -> Self {
        SynthesisError::Configuration(ConfigurationError::Asset(err))
    }
}
