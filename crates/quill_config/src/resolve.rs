//! Resolution of a raw configuration into its sanitized, absolute form.
//!
//! Resolution applies the deliberate defaults (declaration source maps in
//! development mode, incremental state when caching is on), strips path
//! aliases that escape the project root, and flags the no-emit conflict.
//! The result is immutable and is what cache keys are fingerprinted over.

use crate::types::ProjectConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Default project-root-relative location of the incremental-state file,
/// assigned when caching forces incremental mode on without an explicit path.
const DEFAULT_STATE_FILE: &str = ".quill/cache/state.bin";

/// The execution mode of the surrounding build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Interactive development builds (watch mode, dev server).
    Development,
    /// Production and CI builds.
    Production,
}

/// Process-wide switches threaded into resolution explicitly.
///
/// These are deliberately plain values rather than ambient global state so
/// both modes can be exercised in tests without environment manipulation.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext {
    /// Whether the persistent artifact cache is enabled for this process.
    pub cache_enabled: bool,
    /// The execution mode, which affects the declaration-source-map default.
    pub mode: ExecutionMode,
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            mode: ExecutionMode::Production,
        }
    }
}

/// Resolved, sanitized compiler options for one project root.
///
/// Built once per invocation by [`resolve_config`] and immutable thereafter.
/// Every path in here is absolute; every alias target is inside the project
/// root. The serialized form ([`fingerprint`](Self::fingerprint))
/// participates in each source file's cache key, so any resolved option
/// change invalidates every cached entry derived under it.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// Absolute project root the configuration was resolved against.
    pub project_root: PathBuf,
    /// Whether declaration artifacts are emitted.
    pub declaration: bool,
    /// Whether declaration source maps are emitted.
    pub declaration_map: bool,
    /// Set when declaration emission is requested but `no_emit` disables
    /// all output. Non-fatal; the build driver short-circuits on it.
    pub emit_suppressed: bool,
    /// Whether the external compiler runs in incremental mode.
    pub incremental: bool,
    /// Absolute path of the compiler's incremental-state file, if any.
    pub state_file: Option<PathBuf>,
    /// Sanitized symbolic path aliases, absolute targets inside the root.
    pub paths: BTreeMap<String, PathBuf>,
    /// Passthrough compiler options, verbatim from the configuration.
    pub options: BTreeMap<String, toml::Value>,
}

impl ResolvedConfig {
    /// Returns the canonical serialization of this configuration.
    ///
    /// Field order is fixed and all maps are ordered, so two equal resolved
    /// configurations always produce byte-identical fingerprints. Non-UTF-8
    /// paths cannot be serialized as JSON and fall back to the `Debug` form,
    /// which is equally deterministic.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// Resolves a raw [`ProjectConfig`] against a project root.
///
/// Sanitization and defaulting rules:
/// - `declaration && no_emit` sets [`emit_suppressed`](ResolvedConfig::emit_suppressed)
///   with a warning; the conflict is not fatal.
/// - In development mode, declaration source maps default to enabled unless
///   explicitly configured.
/// - Aliases whose target resolves outside the project root are removed.
/// - When caching is enabled and `[incremental]` does not set `enabled`,
///   incremental mode turns on with a default state-file location. When
///   caching is disabled, incremental settings pass through as configured.
pub fn resolve_config(
    raw: ProjectConfig,
    project_root: &Path,
    ctx: &ResolveContext,
) -> ResolvedConfig {
    let root = normalize(project_root);

    let emit_suppressed = raw.emit.declaration && raw.emit.no_emit;
    if emit_suppressed {
        warn!("configuration sets no_emit; declaration artifacts will not be produced");
    }

    let declaration_map = match raw.emit.declaration_map {
        Some(explicit) => explicit,
        None => raw.emit.declaration && ctx.mode == ExecutionMode::Development,
    };

    let paths = sanitize_aliases(raw.paths, &root);

    let (incremental, state_file) = match (ctx.cache_enabled, raw.incremental.enabled) {
        (true, None) => {
            let state = raw
                .incremental
                .state_file
                .as_deref()
                .unwrap_or(DEFAULT_STATE_FILE);
            (true, Some(root.join(state)))
        }
        (_, enabled) => (
            enabled.unwrap_or(false),
            raw.incremental.state_file.as_deref().map(|s| root.join(s)),
        ),
    };

    ResolvedConfig {
        project_root: root,
        declaration: raw.emit.declaration,
        declaration_map,
        emit_suppressed,
        incremental,
        state_file,
        paths,
        options: raw.options,
    }
}

/// Resolves each alias target against the root and drops entries that
/// escape it.
///
/// An alias pointing outside the project root would make the downstream
/// declaration-path rewrite produce references to files the caller does not
/// control, so such entries never reach compilation or fingerprinting.
fn sanitize_aliases(
    raw: BTreeMap<String, String>,
    project_root: &Path,
) -> BTreeMap<String, PathBuf> {
    let mut paths = BTreeMap::new();
    for (alias, target) in raw {
        let resolved = normalize(&project_root.join(&target));
        if resolved.starts_with(project_root) {
            paths.insert(alias, resolved);
        } else {
            debug!(%alias, %target, "removing path alias that resolves outside the project root");
        }
    }
    paths
}

/// Lexically normalizes a path, collapsing `.` and `..` components.
///
/// Purely textual: nothing is required to exist on disk, and symlinks are
/// not followed.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
