//! The build driver: one emit call, one incremental compile pass.

use crate::collection::OutputCollection;
use crate::compiler::{CompileSession, Compiler};
use crate::error::EmitError;
use crate::intercept::OutputInterceptor;
use crate::rewrite::AliasRewriter;
use quill_cache::{CacheStore, Fingerprinter};
use quill_config::{load_config, resolve_config, ExecutionMode, ResolveContext};
use quill_diagnostics::DiagnosticReporter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Process-wide switches for the driver, threaded in at construction so
/// tests can exercise both cache modes without environment manipulation.
#[derive(Debug, Clone, Copy)]
pub struct EmitSettings {
    /// Whether the persistent cache participates. When off, every lookup
    /// misses and nothing is persisted; the control flow is otherwise
    /// unchanged and every call degrades to a full recompute.
    pub cache_enabled: bool,
    /// The execution mode of the surrounding build tool.
    pub mode: ExecutionMode,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            mode: ExecutionMode::Production,
        }
    }
}

/// Owns the incremental compilation session for declaration emission.
///
/// One [`emit`](Self::emit) call is one atomic unit of work: resolve the
/// configuration, seed cached results, run a single compile pass with the
/// interceptor installed as the compiler's only write path, then either
/// fail as one aggregate error (diagnostics) or persist the fresh cache
/// entries and return the reconciled artifact set.
///
/// Input paths are compared exactly against the source paths the compiler
/// reports; callers pass them in the same (absolute) form the compiler
/// uses. Concurrent calls against the same project root are a caller-level
/// ordering responsibility.
pub struct BuildDriver<C, S> {
    compiler: C,
    store: S,
    settings: EmitSettings,
}

impl<C: Compiler, S: CacheStore> BuildDriver<C, S> {
    /// Creates a driver over a compiler and a cache store.
    pub fn new(compiler: C, store: S, settings: EmitSettings) -> Self {
        Self {
            compiler,
            store,
            settings,
        }
    }

    /// Returns the cache store, for inspection or flushing by the embedder.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Produces the declaration artifacts for `inputs` under the project
    /// at `project_root`.
    ///
    /// Returns an empty collection when no configuration exists or when
    /// emission is suppressed by a no-emit conflict. On compiler
    /// diagnostics, every one is reported and the whole run fails; cache
    /// entries seeded from earlier runs remain valid since nothing
    /// invalidated them.
    pub fn emit(
        &mut self,
        inputs: &[PathBuf],
        project_root: &Path,
    ) -> Result<OutputCollection, EmitError> {
        let Some(raw) = load_config(project_root)? else {
            debug!("no configuration at {}; nothing to emit", project_root.display());
            return Ok(OutputCollection::new());
        };
        let ctx = ResolveContext {
            cache_enabled: self.settings.cache_enabled,
            mode: self.settings.mode,
        };
        let config = resolve_config(raw, project_root, &ctx);

        if config.emit_suppressed {
            // The resolver already warned about the conflict.
            debug!("declaration emit skipped: configuration suppresses all output");
            return Ok(OutputCollection::new());
        }
        if !config.declaration {
            debug!("declaration emit disabled by configuration");
            return Ok(OutputCollection::new());
        }

        let mut fingerprinter = Fingerprinter::new(&config);
        let mut collection = OutputCollection::new();

        // Seed from the cache before compiling. The upsert-by-identity rule
        // makes this safe even if the compiler re-emits a seeded file in
        // this same pass: the fresh write replaces the seed in place.
        for input in inputs {
            let key = fingerprinter.key_for(input)?;
            if !self.settings.cache_enabled {
                continue;
            }
            if let Some(cached) = self.store.get(&key) {
                debug!("cache hit for {}", input.display());
                for artifact in cached {
                    collection.upsert(artifact);
                }
            }
        }

        let mut session = self.compiler.create_session(inputs, &config);
        let rewriter = AliasRewriter::new(&config);
        let mut interceptor = OutputInterceptor::new(
            config.state_file.as_deref(),
            inputs,
            &mut fingerprinter,
            &mut collection,
        );
        let diagnostics = session.emit(&mut interceptor, Some(&rewriter));
        drop(session);

        if !diagnostics.is_empty() {
            let reporter = DiagnosticReporter::new(&config.project_root);
            let count = reporter.report_all(&diagnostics);
            // All-or-nothing: the pass's partial output is discarded and
            // nothing from it is persisted.
            return Err(EmitError::Compile { count });
        }

        let entries = interceptor.into_entries();
        if self.settings.cache_enabled {
            for (key, artifacts) in &entries {
                self.store.set(key, artifacts);
            }
        }

        Ok(collection)
    }
}
