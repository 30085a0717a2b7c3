//! Assembly binding for managed actions.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The `%this%` sentinel: bind to the current build's own output.
pub const BUILD_OUTPUT_SENTINEL: &str = "%this%";

/// Where the code implementing a managed action comes from.
///
/// Paths are resolved by the packaging collaborator at build time; this
/// model never opens or validates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssemblySource {
    /// The `%this%` sentinel — the assembly compiled from the authoring
    /// script itself. The default.
    #[default]
    BuildOutput,
    /// An explicit path to a dependency assembly.
    Path {
        /// Filesystem path to the assembly.
        path: PathBuf,
    },
}

impl AssemblySource {
    /// Source from an explicit path, mapping the sentinel back to
    /// [`AssemblySource::BuildOutput`].
    pub fn path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str() == BUILD_OUTPUT_SENTINEL {
            Self::BuildOutput
        } else {
            Self::Path { path }
        }
    }

    /// Returns `true` for the build-output sentinel.
    #[must_use]
    pub fn is_build_output(&self) -> bool {
        matches!(self, Self::BuildOutput)
    }

    /// The explicit path, if any.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::BuildOutput => None,
            Self::Path { path } => Some(path),
        }
    }
}

impl fmt::Display for AssemblySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuildOutput => f.write_str(BUILD_OUTPUT_SENTINEL),
            Self::Path { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Ordered, de-duplicated set of extra assemblies a managed action needs at
/// run time because they are not guaranteed present on the target machine.
///
/// Insertion order is preserved so the packaging step copies them in the
/// order the author listed them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefAssemblies(IndexSet<PathBuf>);

impl RefAssemblies {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path; duplicates are ignored, order preserved.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.0.insert(path.into())
    }

    /// Returns `true` if no reference assemblies were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared reference assemblies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for RefAssemblies {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
