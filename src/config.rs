/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Connection settings for the remote service.
//!
//! The host establishes the session (credential storage and the
//! authentication flow live outside this crate); the core only
//! consumes an already-valid `Settings`. Settings deserialize from
//! the host's config file and can also be assembled from environment
//! variables for headless use.

use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings problems surfaced before any request is made.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

/// Everything needed to talk to one remote instance.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Base URL of the remote instance, scheme included
    /// (e.g. `https://example.testhub.io`).
    pub base_url: String,
    /// Account name for basic auth.
    pub username: String,
    /// API key for basic auth. Assumed valid; the core performs no
    /// authentication flow of its own.
    pub api_key: String,
    /// When set, the root of the tree shows only this project.
    #[serde(default)]
    pub project_id: Option<u64>,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Settings {
    /// Construct settings with defaults for the optional fields.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            api_key: api_key.into(),
            project_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read settings from `SUITETREE_URL`, `SUITETREE_USER`,
    /// `SUITETREE_KEY`, and optionally `SUITETREE_PROJECT`.
    pub fn from_env() -> Result<Self, SettingsError> {
        let var = |name: &'static str| {
            std::env::var(name).map_err(|_| SettingsError::MissingVar(name))
        };
        let mut settings = Self::new(
            var("SUITETREE_URL")?,
            var("SUITETREE_USER")?,
            var("SUITETREE_KEY")?,
        );
        if let Ok(raw) = std::env::var("SUITETREE_PROJECT") {
            let id = raw
                .parse::<u64>()
                .map_err(|e| SettingsError::Invalid("SUITETREE_PROJECT", e.to_string()))?;
            settings.project_id = Some(id);
        }
        Ok(settings)
    }

    /// Base URL with any trailing slash removed, so endpoint paths
    /// can be appended uniformly.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
