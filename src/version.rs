//! Version string shown by `task --version`.
//!
//! Release builds inject `TASK_VERSION` at compile time. Anything else falls
//! back to the crate metadata Cargo embeds, optionally followed by a build
//! checksum passed in as `TASK_BUILD_SUM`.

use std::sync::OnceLock;

/// Provenance recorded for the running binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo<'a> {
    pub version: &'a str,
    pub sum: &'a str,
}

impl BuildInfo<'static> {
    /// Provenance embedded by Cargo for this binary.
    pub fn embedded() -> Option<Self> {
        Some(BuildInfo {
            version: option_env!("CARGO_PKG_VERSION")?,
            sum: option_env!("TASK_BUILD_SUM").unwrap_or_default(),
        })
    }
}

static VERSION: OnceLock<String> = OnceLock::new();

/// Resolve the version string once and return it on every later call.
pub fn version() -> &'static str {
    VERSION.get_or_init(|| resolve_version(option_env!("TASK_VERSION"), BuildInfo::embedded()))
}

/// Build the display version from an injected value and build provenance.
pub fn resolve_version(injected: Option<&str>, info: Option<BuildInfo<'_>>) -> String {
    if let Some(injected) = injected.filter(|v| !v.is_empty()) {
        return injected.to_string();
    }

    let Some(info) = info.filter(|i| !i.version.is_empty()) else {
        return "unknown".to_string();
    };

    if info.sum.is_empty() {
        info.version.to_string()
    } else {
        format!("{} ({})", info.version, info.sum)
    }
}
