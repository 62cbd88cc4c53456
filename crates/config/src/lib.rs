//! Configuration for the `dlms` binary.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults, rooted in the platform data directory.
//! 2. An optional configuration file (`.toml`, `.yaml`/`.yml` or `.json`).
//! 3. Environment variables prefixed with `DLMS_`, e.g. `DLMS_BUILDS_ROOT`.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const ENV_PREFIX: &str = "DLMS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Live content store (SQLite file).
    pub database: PathBuf,
    /// Directory receiving one sub-directory per built version.
    pub builds_root: PathBuf,
    /// Storage prefix stripped from content file paths in artifacts.
    pub content_prefix: PathBuf,
    /// File name of the portable database inside its version directory.
    pub artifact_name: String,
}

impl Default for Config {
    fn default() -> Self {
        let root = data_dir();
        Self {
            database: root.join("dlms.sqlite3"),
            builds_root: root.join("builds"),
            content_prefix: PathBuf::from("contents"),
            artifact_name: "library.db".to_string(),
        }
    }
}

/// Platform data directory, or `./.dlms` when no home directory is known.
fn data_dir() -> PathBuf {
    ProjectDirs::from("org", "dlms", "dlms")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".dlms"))
}

impl Config {
    /// Load, merge and validate all configuration sources.
    #[tracing::instrument]
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config: Self = Self::figment(file)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// The layered sources, without extracting them.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            if !file.is_file() {
                exn::bail!(ErrorKind::Invalid(format!("config file {} does not exist", file.display())));
            }
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file_exact(file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file_exact(file)),
                Some("json") => figment.merge(Json::file_exact(file)),
                _ => exn::bail!(ErrorKind::Invalid(format!(
                    "unsupported config file format: {}",
                    file.display()
                ))),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn validate(&self) -> Result<()> {
        let mut components = Path::new(&self.artifact_name).components();
        if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
            exn::bail!(ErrorKind::Invalid(format!(
                "artifact_name must be a bare file name, got {:?}",
                self.artifact_name
            )));
        }
        if self.content_prefix.as_os_str().is_empty() || !self.content_prefix.is_relative() {
            exn::bail!(ErrorKind::Invalid(format!(
                "content_prefix must be a non-empty relative path, got {:?}",
                self.content_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;
    use std::io::Write;

    fn file_with(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.content_prefix, Path::new("contents"));
        assert_eq!(config.artifact_name, "library.db");
        assert!(config.builds_root.ends_with("builds"));
        config.validate().unwrap();
    }

    #[test]
    fn test_default_keys() {
        let defaults = Figment::from(Serialized::defaults(Config::default()));
        for key in ["database", "builds_root", "content_prefix", "artifact_name"] {
            assert!(defaults.find_value(key).is_ok(), "{key}");
        }
        assert!(defaults.find_value("media_root").is_err());
    }

    #[rstest]
    #[case(".toml", "builds_root = \"/srv/builds\"\nartifact_name = \"solar.db\"\n")]
    #[case(".yaml", "builds_root: /srv/builds\nartifact_name: solar.db\n")]
    #[case(".json", r#"{"builds_root": "/srv/builds", "artifact_name": "solar.db"}"#)]
    fn test_file_formats(#[case] suffix: &str, #[case] contents: &str) {
        let file = file_with(suffix, contents);
        // Inside a jail so no concurrently set `DLMS_*` variable leaks in.
        Jail::expect_with(|_| {
            let config: Config = Config::figment(Some(file.path())).unwrap().extract().unwrap();
            assert_eq!(config.builds_root, Path::new("/srv/builds"));
            assert_eq!(config.artifact_name, "solar.db");
            // Untouched keys keep their defaults.
            assert_eq!(config.content_prefix, Path::new("contents"));
            Ok(())
        });
    }

    #[test]
    fn test_unsupported_extension() {
        let file = file_with(".ini", "builds_root = /srv");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/dlms.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_malformed_file() {
        let file = file_with(".toml", "builds_root = [");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert_eq!(&*err, &ErrorKind::Load);
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("dlms.toml", "content_prefix = \"uploads\"\nartifact_name = \"file.db\"\n")?;
            jail.set_env("DLMS_ARTIFACT_NAME", "env.db");
            let config = Config::load(Some(Path::new("dlms.toml"))).unwrap();
            assert_eq!(config.content_prefix, Path::new("uploads"));
            assert_eq!(config.artifact_name, "env.db");
            Ok(())
        });
    }

    #[rstest]
    #[case("library.db", "contents", true)]
    #[case("nested/library.db", "contents", false)]
    #[case("..", "contents", false)]
    #[case("", "contents", false)]
    #[case("library.db", "/var/contents", false)]
    #[case("library.db", "", false)]
    #[case("library.db", "media/contents", true)]
    fn test_validate(#[case] artifact_name: &str, #[case] content_prefix: &str, #[case] ok: bool) {
        let config = Config {
            artifact_name: artifact_name.to_string(),
            content_prefix: PathBuf::from(content_prefix),
            ..Config::default()
        };
        match config.validate() {
            Ok(()) => assert!(ok),
            Err(err) => {
                assert!(!ok);
                assert!(matches!(&*err, ErrorKind::Invalid(_)));
            }
        }
    }
}
