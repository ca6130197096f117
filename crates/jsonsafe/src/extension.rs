//! Base-URL selection for the browser-extension companion.
//!
//! Store installs get an `update_url` injected into their manifest; builds
//! loaded unpacked from disk do not. That difference picks the API origin.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallKind {
    /// Installed from a store; talks to production.
    Packaged,
    /// Loaded unpacked during development.
    Unpacked,
}

impl InstallKind {
    pub fn detect(manifest: &serde_json::Value) -> Self {
        match manifest.get("update_url") {
            Some(serde_json::Value::String(url)) if !url.is_empty() => InstallKind::Packaged,
            _ => InstallKind::Unpacked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub production_url: String,
    pub development_url: String,
}

impl ExtensionConfig {
    pub fn base_url(&self, kind: InstallKind) -> &str {
        match kind {
            InstallKind::Packaged => &self.production_url,
            InstallKind::Unpacked => &self.development_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub manifest_version: u8,
    #[serde(default)]
    pub update_url: Option<String>,
}

impl Manifest {
    pub fn parse(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let manifest = Self::parse(&text)?;
        debug!(path = %path.display(), name = %manifest.name, "loaded extension manifest");
        Ok(manifest)
    }

    pub fn install_kind(&self) -> InstallKind {
        match self.update_url.as_deref() {
            Some(url) if !url.is_empty() => InstallKind::Packaged,
            _ => InstallKind::Unpacked,
        }
    }
}
