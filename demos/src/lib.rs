// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Arbor demos: tree fixtures and log setup.

use arbor_tree::{TreeLayoutConfig, TreeNode};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// A laid-out tree as stored on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct TreeFile {
    /// Node footprint. Defaults to 150 × 180.
    #[serde(default)]
    pub layout: TreeLayoutConfig,
    /// Laid-out members.
    pub nodes: Vec<TreeNode>,
}

impl TreeFile {
    /// Parses a tree from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The small four-generation tree shipped with the demos.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(include_str!("../data/family.json"))
    }
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
