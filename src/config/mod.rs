// src/config/mod.rs
pub mod types;

use std::path::{Path, PathBuf};

pub use self::types::{AnalysisConfig, Config, OutputConfig, StoreConfig};
use crate::error::{CollabError, Result};
use crate::events::EventLogger;

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "collabnet.toml";

impl Config {
    /// Loads `path`, or `collabnet.toml` when `path` is `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    ///
    /// # Errors
    /// Returns [`CollabError::Config`] if the file is unreadable, is not
    /// valid TOML, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };

        if !path.exists() {
            if explicit {
                return Err(CollabError::Config(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
            tracing::debug!("no {CONFIG_FILE}; using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| CollabError::io(e, &path))?;
        Self::parse_toml(&content).map_err(|e| match e {
            CollabError::Config(msg) => CollabError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or invalid.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`CollabError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        if !(a.significance > 0.0 && a.significance < 1.0) {
            return Err(CollabError::Config(format!(
                "analysis.significance must be in (0, 1), got {}",
                a.significance
            )));
        }
        if !(a.resolution > 0.0 && a.resolution.is_finite()) {
            return Err(CollabError::Config(format!(
                "analysis.resolution must be positive, got {}",
                a.resolution
            )));
        }
        Ok(())
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, db: Option<PathBuf>, seed: Option<u64>) -> Self {
        if let Some(db) = db {
            self.store.path = db;
        }
        if let Some(seed) = seed {
            self.analysis.seed = seed;
        }
        self
    }

    /// Event logger for this configuration.
    #[must_use]
    pub fn event_logger(&self) -> EventLogger {
        if self.output.events {
            EventLogger::new(&self.output.dir)
        } else {
            EventLogger::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let config = Config::parse_toml(
            r#"
            [analysis]
            seed = 7

            [store]
            path = "data/hits.db"
            "#,
        )?;
        assert_eq!(config.analysis.seed, 7);
        assert_eq!(config.analysis.significance, 0.05);
        assert_eq!(config.analysis.top_genres, 3);
        assert_eq!(config.store.path, PathBuf::from("data/hits.db"));
        assert!(config.output.events);
        Ok(())
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let cases = vec![
            ("[analysis]\nsignificance = 0.0", "significance"),
            ("[analysis]\nsignificance = 1.5", "significance"),
            ("[analysis]\nresolution = -1.0", "resolution"),
            ("[analysis]\nseed = \"x\"", ""),
        ];
        for (toml, field) in cases {
            match Config::parse_toml(toml) {
                Err(CollabError::Config(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("expected config error for {toml:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().with_overrides(Some(PathBuf::from("x.db")), Some(9));
        assert_eq!(config.store.path, PathBuf::from("x.db"));
        assert_eq!(config.analysis.seed, 9);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let res = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(res, Err(CollabError::Config(_))));
    }
}
