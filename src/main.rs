//! `deplocal` — rewrite remote `deps.txt` URLs to locally mirrored archives.
//!
//! # Overview
//!
//! This binary is a build-pipeline helper.  It reads the semicolon-
//! delimited dependency manifest at `cmake/deps.txt`, downloads every
//! entry whose location is an `https://` URL into a local directory, and
//! rewrites the manifest so those entries point at the downloaded files.
//! It runs after the CI agent has (or instead of the CI agent having)
//! mirrored the archives, so later build steps resolve dependencies from
//! disk instead of the network.
//!
//! A one-time backup (`cmake/deps.txt.bak`) of the pristine manifest is
//! kept and preferred as input on later runs, making the tool idempotent:
//! the live manifest is always derived from the original URL list, never
//! from its own previous output.
//!
//! # Usage
//!
//! ```text
//! deplocal --new_dir /build/deps          # download + rewrite
//! deplocal --new_dir /build/deps --download 0   # rewrite only
//! deplocal                                # target dir from $BUILD_BINARIESDIRECTORY/deps
//! deplocal --root /src/checkout           # manifest lives elsewhere
//! ```
//!
//! # Module layout
//!
//! | Module       | Responsibility                                       |
//! |--------------|------------------------------------------------------|
//! | [`cli`]      | Argument types parsed by clap                        |
//! | [`config`]   | Target-directory + manifest path resolution          |
//! | [`manifest`] | Entry parsing, backup-first load, serialization      |
//! | [`rewrite`]  | Remote-URL → local-path mapping                      |
//! | [`fetch`]    | Download with retry + insecure fallback              |
//! | [`ui`]       | Styled notes, progress bar, run summary              |
//! | [`run`]      | The localize pipeline                                |

mod cli;
mod config;
mod fetch;
mod manifest;
mod rewrite;
mod run;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use fetch::{FetchPolicy, Fetcher};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The environment is read exactly once, here, and injected below;
    // nothing deeper in the crate touches process-global state.
    let env_dir = std::env::var_os(config::ENV_DOWNLOAD_DIR).map(PathBuf::from);

    let locations = config::resolve(&cli, env_dir.as_deref())?;
    config::prepare(&locations)?;

    let fetcher = Fetcher::new(FetchPolicy::default())?;
    run::run(&locations, &fetcher)
}
