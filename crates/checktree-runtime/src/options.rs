#![forbid(unsafe_code)]

//! Plain-data engine options.
//!
//! [`TreeOptions`] holds the tunables that are data rather than code: how far
//! reconciliation runs per transition and when subscribers hear about it.
//! The injected functions (children accessor, comparator, disabled predicate)
//! live on [`CheckboxTreeConfig`](crate::CheckboxTreeConfig) instead.
//!
//! # Loading
//!
//! With the `options-config` feature, options load from TOML or JSON:
//!
//! ```toml
//! # checktree.toml
//! reconcile = "single-pass"
//! notify = "every-transition"
//! ```
//!
//! ```rust,ignore
//! let options = TreeOptions::from_toml_file("checktree.toml")?;
//! let options = TreeOptions::from_json_str(r#"{ "reconcile": "fixed-point" }"#)?;
//! ```
//!
//! Missing keys keep their defaults.

#[cfg(feature = "options-config")]
use std::path::Path;

#[cfg(feature = "options-config")]
use serde::{Deserialize, Serialize};

use checktree_core::ReconcileMode;

/// When subscribers are notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "options-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "options-config", serde(rename_all = "kebab-case"))]
pub enum NotifyPolicy {
    /// Only after transitions that changed the checked collection.
    #[default]
    OnChange,
    /// After every settled transition, changed or not.
    EveryTransition,
}

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "options-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "options-config", serde(default))]
pub struct TreeOptions {
    /// Reconciliation depth per transition.
    pub reconcile: ReconcileMode,
    /// Subscriber notification policy.
    pub notify: NotifyPolicy,
}

impl TreeOptions {
    /// Set the reconciliation mode.
    #[must_use]
    pub fn with_reconcile(mut self, reconcile: ReconcileMode) -> Self {
        self.reconcile = reconcile;
        self
    }

    /// Set the notification policy.
    #[must_use]
    pub fn with_notify(mut self, notify: NotifyPolicy) -> Self {
        self.notify = notify;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "options-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "options-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "options-config")]
    pub fn from_json_str(s: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "options-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "options-config")]
    pub fn to_toml_string(&self) -> Result<String, OptionsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Errors loading [`TreeOptions`].
#[cfg(feature = "options-config")]
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
