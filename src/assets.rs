// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bootstrap Asset Publication
//!
//! The asset-publishing service (turning a local directory into a fetchable
//! object) is an external collaborator. It is modeled here as a trait so
//! synthesis stays side-effect free; the default implementation derives a
//! stable URL from the bundle path without touching the filesystem.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Asset publication error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset path is empty")]
    EmptyPath,

    #[error("Asset publication failed: {0}")]
    PublicationFailed(String),
}

/// A published asset bundle, fetchable by URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedAsset {
    pub url: String,
}

/// Turns a local directory into a fetchable object
pub trait AssetPublisher {
    fn publish(&self, path: &Path) -> Result<PublishedAsset, AssetError>;
}

/// Default publisher mapping a bundle path to a deterministic URL
///
/// Keeps synthesis idempotent: the same path always publishes to the same
/// URL, so repeated passes emit structurally equal graphs.
#[derive(Debug, Clone)]
pub struct StaticAssetPublisher {
    base_url: String,
}

impl StaticAssetPublisher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for StaticAssetPublisher {
    fn default() -> Self {
        Self::new("https://assets.demo.internal")
    }
}

impl AssetPublisher for StaticAssetPublisher {
    fn publish(&self, path: &Path) -> Result<PublishedAsset, AssetError> {
        if path.as_os_str().is_empty() {
            return Err(AssetError::EmptyPath);
        }

        let slug: String = path
            .to_string_lossy()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '-'
                }
            })
            .collect::<String>()
            .trim_matches('-')
            .to_string();

        if slug.is_empty() {
            return Err(AssetError::EmptyPath);
        }

        Ok(PublishedAsset {
            url: format!("{}/{}.zip", self.base_url, slug),
        })
    }
}
