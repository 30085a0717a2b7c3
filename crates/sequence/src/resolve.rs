//! The seam to the packaging collaborator that materializes assemblies.

use std::path::{Path, PathBuf};

use packwright_action::AssemblySource;

/// Resolves assembly sources to concrete files for the renderer.
///
/// The descriptor model never opens paths itself; everything filesystem-
/// shaped goes through this trait so the build step owns resolution and
/// tests can substitute an in-memory stub.
pub trait AssemblyResolver {
    /// Resolve a source to the file the renderer should link.
    ///
    /// The [`AssemblySource::BuildOutput`] sentinel binds to the current
    /// build's own compiled output. Returns `None` when the source cannot
    /// be located.
    fn resolve(&self, source: &AssemblySource) -> Option<PathBuf>;

    /// Whether `assembly` exposes an entry-point named `method` with the
    /// action signature.
    fn has_method(&self, assembly: &Path, method: &str) -> bool;
}

/// Filesystem-backed resolver used during a real package build.
///
/// Resolves the sentinel to the configured build output and explicit paths
/// by existence check. Method presence inside a managed assembly is the
/// linker's to verify, so this resolver only rejects the trivially wrong
/// case of an empty method name.
#[derive(Debug, Clone)]
pub struct FsResolver {
    build_output: PathBuf,
}

impl FsResolver {
    /// Resolver binding the `%this%` sentinel to `build_output`.
    #[must_use]
    pub fn new(build_output: impl Into<PathBuf>) -> Self {
        Self {
            build_output: build_output.into(),
        }
    }
}

impl AssemblyResolver for FsResolver {
    fn resolve(&self, source: &AssemblySource) -> Option<PathBuf> {
        let path = match source {
            AssemblySource::BuildOutput => &self.build_output,
            AssemblySource::Path { path } => path,
        };
        path.is_file().then(|| path.clone())
    }

    fn has_method(&self, _assembly: &Path, method: &str) -> bool {
        !method.is_empty()
    }
}
