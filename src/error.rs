//! Errors raised while locating, loading and converting the config file.
//!
//! Any of these aborts the run before a single unit executes.  Unit
//! failures are [`ResourceError`](crate::resources::ResourceError) values
//! instead and never abort the run.  The command layer converts
//! [`ConfigError`] into [`anyhow::Error`] with the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::template::TemplateError;

/// Errors that arise from config discovery, parsing and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config file was found in the start directory or its ancestors.
    #[error("unable to find {} in {} or any parent directory", names.join(" or "), start.display())]
    NotFound {
        /// File names searched for, in order.
        names: Vec<&'static str>,
        /// Directory the search started from.
        start: PathBuf,
    },

    /// The config file could not be read.
    #[error("unable to read config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid YAML or does not match the schema.
    #[error("unable to parse config file {}: {source}", path.display())]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Underlying parser error, with location.
        source: serde_yaml::Error,
    },

    /// The requested instance is not defined.
    #[error("There is no instance {instance:?} in {available:?}")]
    UnknownInstance {
        /// Instance requested on the command line.
        instance: String,
        /// Instances the config does define.
        available: Vec<String>,
    },

    /// An entry is structurally valid YAML but unusable.
    #[error("invalid {kind} {name:?}: {message}")]
    Invalid {
        /// Unit kind (`link`, `template`, `command`).
        kind: &'static str,
        /// Entry name.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// A path field could not be expanded.
    #[error("unable to expand {kind} {name:?} {field}: {source}")]
    Expand {
        /// Unit kind (`link`, `template`, `command`).
        kind: &'static str,
        /// Entry name.
        name: String,
        /// Field being expanded.
        field: &'static str,
        /// Render failure.
        source: TemplateError,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_name() {
        let err = ConfigError::NotFound {
            names: vec!["deploy-configs.yml", "deploy-configs.yaml"],
            start: PathBuf::from("/work"),
        };
        assert_eq!(
            err.to_string(),
            "unable to find deploy-configs.yml or deploy-configs.yaml in /work or any parent directory"
        );
    }

    #[test]
    fn unknown_instance_lists_available() {
        let err = ConfigError::UnknownInstance {
            instance: "laptop".to_string(),
            available: vec!["desktop".to_string(), "server".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "There is no instance \"laptop\" in [\"desktop\", \"server\"]"
        );
    }

    #[test]
    fn expand_names_the_field_and_key() {
        let err = ConfigError::Expand {
            kind: "link",
            name: "vim".to_string(),
            field: "target",
            source: TemplateError::MissingKey {
                line: 1,
                action: ".GitRoot".to_string(),
                key: "GitRoot".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("unable to expand link \"vim\" target:"));
        assert!(msg.contains("GitRoot"));
    }
}
