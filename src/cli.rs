//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The `Cli` struct is parsed once in `main` and then
//! passed (by reference) into path resolution and the pipeline.
//!
//! The flag spellings (`--new_dir`, `--download 0|1`) match what the CI
//! build scripts already pass, so the long names are pinned explicitly
//! instead of taking clap's kebab-case default.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name    = "deplocal",
    about   = "Rewrite remote deps.txt URLs to locally mirrored archives",
    version,
    // Show a compact two-column help layout.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Directory that receives the downloaded archives.
    ///
    /// Used exactly as given.  When omitted, the directory is derived from
    /// the `BUILD_BINARIESDIRECTORY` environment variable instead (a `deps`
    /// subdirectory underneath it); if that is unset too, the run aborts
    /// before touching anything.
    #[arg(long = "new_dir")]
    pub new_dir: Option<PathBuf>,

    /// Whether to actually download remote archives (1) or only rewrite
    /// manifest locations (0).
    ///
    /// With `--download 0` no network connection is made and the rewritten
    /// paths may point at files that do not exist yet — useful when a
    /// separate pipeline step has already populated the directory.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub download: u8,

    /// Repository root containing `cmake/deps.txt`.
    ///
    /// Defaults to the current working directory.  Pass `--root` when
    /// invoking from somewhere other than a source checkout's top level
    /// (e.g. from a CI task whose working directory is a build tree).
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

impl Cli {
    /// `true` unless `--download 0` was passed.
    pub const fn download_enabled(&self) -> bool {
        self.download != 0
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("deplocal").chain(extra.iter().copied()))
    }

    #[test]
    fn download_defaults_to_enabled() {
        assert!(parse(&[]).download_enabled());
    }

    #[test]
    fn download_zero_disables() {
        assert!(!parse(&["--download", "0"]).download_enabled());
    }

    #[test]
    fn download_one_enables() {
        assert!(parse(&["--download", "1"]).download_enabled());
    }

    #[test]
    fn download_rejects_other_values() {
        let result = Cli::try_parse_from(["deplocal", "--download", "2"]);
        assert!(result.is_err(), "--download only accepts 0 or 1");
    }

    #[test]
    fn new_dir_uses_snake_case_long_flag() {
        let cli = parse(&["--new_dir", "/tmp/deps"]);
        assert_eq!(cli.new_dir, Some(PathBuf::from("/tmp/deps")));
    }

    #[test]
    fn new_dir_defaults_to_none() {
        assert!(parse(&[]).new_dir.is_none());
    }

    #[test]
    fn root_defaults_to_cwd() {
        assert_eq!(parse(&[]).root, PathBuf::from("."));
    }
}
