//! The narrow seam to the external incremental compiler.
//!
//! The compiler is a stateful black box. This subsystem only needs to
//! create a session over a set of inputs and run a single emit pass with an
//! injected write sink and an optional declaration post-transform; its
//! module resolution and type checking stay on the far side of these traits.

use quill_config::ResolvedConfig;
use quill_diagnostics::Diagnostic;
use std::path::{Path, PathBuf};

/// One file the compiler wants to write during an emit pass.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactWrite<'a> {
    /// The output file name (or, for incremental state, the full target path).
    pub file_name: &'a str,
    /// The content to write.
    pub text: &'a str,
    /// The source file this output was generated from, when the compiler
    /// can attribute it.
    pub source: Option<&'a Path>,
}

/// The sole sink for everything the compiler writes during one pass.
///
/// The build driver owns the sink for exactly one compile pass; the
/// compiler never touches the filesystem for artifacts directly.
pub trait WriteSink {
    /// Accepts one write.
    fn write(&mut self, write: ArtifactWrite<'_>);
}

/// A post-transform applied to declaration text before it reaches the sink.
pub trait DeclarationTransform {
    /// Transforms the declaration `text` emitted for `source`.
    fn apply(&self, source: &Path, text: String) -> String;
}

/// Factory for compile sessions.
pub trait Compiler {
    /// Creates one incremental compilation session scoped to `inputs`
    /// under the given resolved configuration.
    fn create_session<'a>(
        &'a self,
        inputs: &[PathBuf],
        config: &ResolvedConfig,
    ) -> Box<dyn CompileSession + 'a>;
}

/// One stateful compilation session.
pub trait CompileSession {
    /// Runs a single emit pass, routing every write through `sink` and
    /// applying `transform` to declaration output. Returns the diagnostics
    /// the pass produced; an empty list means success.
    fn emit(
        &mut self,
        sink: &mut dyn WriteSink,
        transform: Option<&dyn DeclarationTransform>,
    ) -> Vec<Diagnostic>;
}
