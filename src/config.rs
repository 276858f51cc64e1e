//! Path resolution — where the manifest lives and where downloads go.
//!
//! Everything process-global is injected here rather than read ad hoc: the
//! repository root comes from `--root` (defaulting to the current
//! directory) and the `BUILD_BINARIESDIRECTORY` environment variable is
//! read exactly once in `main` and passed in as a plain `Option`.  That
//! keeps every function in this module deterministic and unit-testable
//! without touching the real environment.
//!
//! # Resolution rules
//!
//! | `--new_dir` | env var | target directory          |
//! |-------------|---------|---------------------------|
//! | given       | —       | `<new_dir>` verbatim      |
//! | omitted     | set     | `<env>/deps`              |
//! | omitted     | unset   | fatal configuration error |

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::cli::Cli;

/// Manifest path relative to the repository root.
pub const MANIFEST_REL: &str = "cmake/deps.txt";

/// Backup path relative to the repository root.
pub const BACKUP_REL: &str = "cmake/deps.txt.bak";

/// Environment variable consulted when `--new_dir` is omitted.
pub const ENV_DOWNLOAD_DIR: &str = "BUILD_BINARIESDIRECTORY";

/// Subdirectory of [`ENV_DOWNLOAD_DIR`] that receives the archives.
pub const DOWNLOAD_SUBDIR: &str = "deps";

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Configuration failures.  All of these abort the run before any file or
/// network I/O happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no download directory: pass --new_dir or set {ENV_DOWNLOAD_DIR}")]
    MissingTargetDir,

    #[error("creating download directory {}", path.display())]
    CreateTargetDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ─── Resolved locations ───────────────────────────────────────────────────────

/// Every path the pipeline touches, resolved up front.
#[derive(Debug)]
pub struct Locations {
    /// The live manifest (`<root>/cmake/deps.txt`), read on the first run
    /// and overwritten at the end of every run.
    pub manifest: PathBuf,

    /// The pristine copy (`<root>/cmake/deps.txt.bak`).  Created once;
    /// preferred as input on every later run.
    pub backup: PathBuf,

    /// Directory that receives (or already holds) the archives.
    pub target_dir: PathBuf,

    /// Whether remote archives are actually fetched.
    pub download: bool,
}

/// Resolve all paths from the CLI and the injected environment value.
///
/// `env_dir` is the value of [`ENV_DOWNLOAD_DIR`], or `None` when unset.
/// Fails fast with [`ConfigError::MissingTargetDir`] when neither source
/// yields a target directory — there is deliberately no silent default.
pub fn resolve(cli: &Cli, env_dir: Option<&Path>) -> Result<Locations, ConfigError> {
    let target_dir = match (&cli.new_dir, env_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(env)) => env.join(DOWNLOAD_SUBDIR),
        (None, None) => return Err(ConfigError::MissingTargetDir),
    };

    Ok(Locations {
        manifest: cli.root.join(MANIFEST_REL),
        backup: cli.root.join(BACKUP_REL),
        target_dir,
        download: cli.download_enabled(),
    })
}

/// Create the target directory (and parents) when downloading is enabled.
///
/// With `--download 0` nothing is created: the rewritten paths are allowed
/// to point into a directory that another pipeline step will populate.
pub fn prepare(loc: &Locations) -> Result<(), ConfigError> {
    if loc.download && !loc.target_dir.is_dir() {
        std::fs::create_dir_all(&loc.target_dir).map_err(|source| {
            ConfigError::CreateTargetDir {
                path: loc.target_dir.clone(),
                source,
            }
        })?;
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
