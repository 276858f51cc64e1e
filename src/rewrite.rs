//! Remote-URL → local-path mapping.
//!
//! This module is responsible for *computing* where a remote archive lands
//! on disk.  It deliberately does **not** download anything — network I/O
//! lives in [`crate::fetch`] — so every function here is pure and
//! trivially unit-testable.
//!
//! # Mapping
//!
//! A location is remote when it starts with `https://`.  Its local file
//! name is the URL with that prefix stripped and every `/` replaced by
//! `_`, flattened into the target directory:
//!
//! ```text
//! https://github.com/onnx/onnx/archive/v1.16.zip
//!   → <target>/github.com_onnx_onnx_archive_v1.16.zip
//! ```
//!
//! The mapping is deterministic: the same URL always yields the same path,
//! so an archive downloaded by an earlier run (or a pre-seeded cache
//! directory) is found again.  Distinct URLs can collide only if they
//! differ solely in `/` vs `_`, which does not occur in practice for
//! archive URLs.

use std::path::{Path, PathBuf};

/// Scheme marker identifying a location that must be downloaded.
pub const REMOTE_PREFIX: &str = "https://";

/// Whether `location` needs downloading (as opposed to being a local or
/// already-rewritten path).
pub fn is_remote(location: &str) -> bool {
    location.starts_with(REMOTE_PREFIX)
}

/// Compute the flat local path for a remote `location` inside `target_dir`.
///
/// Callers must only pass locations for which [`is_remote`] is true; a
/// non-remote location is returned joined as-is.
pub fn local_path_for(target_dir: &Path, location: &str) -> PathBuf {
    let rest = location.strip_prefix(REMOTE_PREFIX).unwrap_or(location);
    target_dir.join(rest.replace('/', "_"))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── is_remote ────────────────────────────────────────────────────────────

    #[test]
    fn https_urls_are_remote() {
        assert!(is_remote("https://example.com/a.zip"));
    }

    #[test]
    fn plain_http_is_not_remote() {
        // Only the secure scheme marker triggers a download; everything
        // else is passed through as a local path.
        assert!(!is_remote("http://example.com/a.zip"));
    }

    #[test]
    fn local_paths_are_not_remote() {
        assert!(!is_remote("/build/deps/example.com_a.zip"));
        assert!(!is_remote("relative/path.zip"));
    }

    #[test]
    fn prefix_must_be_at_the_start() {
        assert!(!is_remote(" https://example.com/a.zip"));
    }

    // ── local_path_for ───────────────────────────────────────────────────────

    #[test]
    fn strips_scheme_and_flattens_slashes() {
        let path = local_path_for(
            Path::new("/tmp/deps"),
            "https://github.com/onnx/onnx/archive/v1.16.zip",
        );
        assert_eq!(
            path,
            PathBuf::from("/tmp/deps/github.com_onnx_onnx_archive_v1.16.zip")
        );
    }

    #[test]
    fn identical_urls_map_to_identical_paths() {
        let url = "https://example.com/a/b.zip";
        let dir = Path::new("/d");
        assert_eq!(local_path_for(dir, url), local_path_for(dir, url));
    }

    #[test]
    fn distinct_urls_map_to_distinct_paths() {
        let dir = Path::new("/d");
        let a = local_path_for(dir, "https://example.com/a/b.zip");
        let b = local_path_for(dir, "https://example.com/a/c.zip");
        assert_ne!(a, b);
    }

    #[test]
    fn query_strings_are_kept_in_the_file_name() {
        let path = local_path_for(Path::new("/d"), "https://example.com/a.zip?rev=7");
        assert_eq!(path, PathBuf::from("/d/example.com_a.zip?rev=7"));
    }

    #[test]
    fn snapshot_mapping_for_typical_dependency_urls() {
        let dir = Path::new("/build/deps");
        let mapped: Vec<String> = [
            "https://github.com/abseil/abseil-cpp/archive/refs/tags/20240722.0.zip",
            "https://github.com/protocolbuffers/protobuf/archive/v21.12.zip",
            "https://example.com/a/b.zip",
        ]
        .iter()
        .map(|url| local_path_for(dir, url).display().to_string())
        .collect();

        insta::assert_debug_snapshot!(mapped, @r#"
        [
            "/build/deps/github.com_abseil_abseil-cpp_archive_refs_tags_20240722.0.zip",
            "/build/deps/github.com_protocolbuffers_protobuf_archive_v21.12.zip",
            "/build/deps/example.com_a_b.zip",
        ]
        "#);
    }
}
