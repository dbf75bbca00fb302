// Copyright (c) 2025 - Cowboy AI, Inc.
//! Instance Sizing, Machine Images and Security-Rule Protocols

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Instance value object validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("Unknown instance size class: {0}")]
    UnknownSizeClass(String),

    #[error("Machine image reference cannot be empty")]
    EmptyMachineImage,
}

/// Size class of a provisioned compute node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceSize {
    Nano,
    Micro,
    Small,
    Medium,
}

impl fmt::Display for InstanceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceSize::Nano => write!(f, "nano"),
            InstanceSize::Micro => write!(f, "micro"),
            InstanceSize::Small => write!(f, "small"),
            InstanceSize::Medium => write!(f, "medium"),
        }
    }
}

impl Default for InstanceSize {
    fn default() -> Self {
        InstanceSize::Nano
    }
}

impl FromStr for InstanceSize {
    type Err = InstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nano" => Ok(InstanceSize::Nano),
            "micro" => Ok(InstanceSize::Micro),
            "small" => Ok(InstanceSize::Small),
            "medium" => Ok(InstanceSize::Medium),
            other => Err(InstanceError::UnknownSizeClass(other.to_string())),
        }
    }
}

/// Machine image reference value object
///
/// Opaque to the synthesizer; the provisioning engine resolves it to a
/// concrete image in the target region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineImage(String);

impl MachineImage {
    /// Create a new machine image reference
    ///
    /// # Invariants
    /// - Reference must not be empty
    pub fn new(image: impl Into<String>) -> Result<Self, InstanceError> {
        let image = image.into();
        if image.is_empty() {
            return Err(InstanceError::EmptyMachineImage);
        }
        Ok(Self(image))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MachineImage {
    fn default() -> Self {
        Self("amazon-linux-2".into())
    }
}

impl fmt::Display for MachineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport protocol of a security rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_size_parsing() {
        assert_eq!("nano".parse::<InstanceSize>().unwrap(), InstanceSize::Nano);
        assert_eq!("medium".parse::<InstanceSize>().unwrap(), InstanceSize::Medium);
        assert!("xlarge".parse::<InstanceSize>().is_err());
    }

    #[test]
    fn test_machine_image_validation() {
        assert!(MachineImage::new("amazon-linux-2").is_ok());
        assert!(MachineImage::new("").is_err());
        assert_eq!(MachineImage::default().as_str(), "amazon-linux-2");
    }

    #[test]
    fn test_protocol_display() {
        assert_eq!(Protocol::Tcp.to_string(), "tcp");
        assert_eq!(Protocol::Udp.to_string(), "udp");
    }
}
