//! Content path validation and relativization.
//!
//! Content files are stored relative to the media root under a storage prefix
//! (`contents/report.pdf`). The portable artifact only knows the part after
//! the prefix, always `/`-separated, so it can be shipped to any device.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Validates a stored path for security and correctness.
/// Ensures that paths don't escape the media root (no `..` traversal).
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use dlms_snapshot::path::validate;
/// assert!(validate("contents/report.pdf").is_ok());
/// assert!(validate("contents/../report.pdf").is_ok()); // (never leaves media root)
/// assert!(validate("../etc/passwd").is_err());
/// assert!(validate("a\0b").is_err());
/// assert_eq!(validate("contents//./a/../report.pdf/").unwrap(), Path::new("contents/report.pdf"));
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls; reject them explicitly.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Strip the storage `prefix` from a stored content path, returning the
/// portable `/`-separated remainder.
///
/// Fails with [`InvalidPath`](crate::error::ErrorKind::InvalidPath) if the
/// path is not strictly inside the prefix or is not valid UTF-8.
///
/// ```
/// use dlms_snapshot::path::relativize;
/// assert_eq!(relativize("contents/health/water.pdf", "contents").unwrap(), "health/water.pdf");
/// assert!(relativize("images/logo.png", "contents").is_err());
/// ```
pub fn relativize(path: impl AsRef<Path>, prefix: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let validated = validate(path)?;
    let prefix = validate(prefix)?;
    let Ok(relative) = validated.strip_prefix(&prefix) else {
        exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
    };
    let mut parts = Vec::new();
    for component in relative.components() {
        match component.as_os_str().to_str() {
            Some(part) => parts.push(part),
            None => exn::bail!(ErrorKind::InvalidPath(path.to_path_buf())),
        }
    }
    if parts.is_empty() {
        exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_path_normalization() {
        assert_eq!(validate(Path::new("a//b//c")).unwrap(), Path::new("a/b/c"));
        assert_eq!(validate(Path::new("a/./b/./c")).unwrap(), Path::new("a/b/c"));
        assert_eq!(validate(Path::new("a/b/..")).unwrap(), Path::new("a"));
        assert_eq!(validate(Path::new("contents/")).unwrap(), Path::new("contents"));
    }

    #[rstest]
    #[case("../etc/passwd")]
    #[case("a/../../b")]
    #[case("..")]
    #[case("")]
    #[case("./")]
    #[case("//")]
    #[case("a\0b")]
    fn test_invalid_paths(#[case] path: &str) {
        assert!(validate(Path::new(path)).is_err());
    }

    #[rstest]
    #[case("contents/report.pdf", "contents", "report.pdf")]
    #[case("contents/health/water.pdf", "contents", "health/water.pdf")]
    #[case("/contents/report.pdf", "contents", "report.pdf")]
    #[case("contents/./a/../report.pdf", "contents/", "report.pdf")]
    #[case("media/contents/report.pdf", "media/contents", "report.pdf")]
    fn test_relativize(#[case] path: &str, #[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(relativize(path, prefix).unwrap(), expected);
    }

    #[rstest]
    // Outside of the prefix
    #[case("images/logo.png", "contents")]
    // Component-wise, not string-wise
    #[case("contentsX/report.pdf", "contents")]
    // The prefix itself is not a file
    #[case("contents", "contents")]
    // Escapes the prefix
    #[case("contents/../report.pdf", "contents")]
    fn test_relativize_rejects(#[case] path: &str, #[case] prefix: &str) {
        let err = relativize(path, prefix).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }
}
