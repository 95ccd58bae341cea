//! Config file discovery, YAML loading and validation.
//!
//! A config file declares named instances; each instance lists the links,
//! templates and commands to deploy:
//!
//! ```yaml
//! instances:
//!   desktop:
//!     links:
//!       vim:
//!         target: "{{.GitRoot}}/configs/vim"
//!         link: "{{.Home}}/.config/nvim"
//!       bashrc: ["{{.GitRoot}}/configs/bashrc", "{{.Home}}/.bashrc"]
//!     templates:
//!       gitconfig:
//!         input: "{{.GitRoot}}/configs/gitconfig.tmpl"
//!         output: "{{.Home}}/.gitconfig"
//!         data: { email: me@example.com }
//!     commands:
//!       xresources:
//!         input: "{{.GitRoot}}/configs/Xresources"
//!         output: "{{.Home}}/.Xresources"
//!         command: "cpp {{.Input}} > {{.Output}}"
//! ```
pub mod convert;
pub mod expand;

pub use convert::DeployPlan;
pub use expand::PathExpander;

use serde::{Deserialize, Deserializer};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::resources::fs::{PathStatus, find_entry_ascending};

/// Config file names, in discovery order.
pub const CONFIG_FILE_NAMES: &[&str] = &["deploy-configs.yml", "deploy-configs.yaml"];

/// The whole config file: every instance by name.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Instances by name.
    #[serde(default, deserialize_with = "nullable_instances")]
    pub instances: BTreeMap<String, Config>,
}

/// The units declared for one instance.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Symlinks by name.
    #[serde(default, deserialize_with = "nullable")]
    pub links: BTreeMap<String, LinkConfig>,
    /// Templates by name.
    #[serde(default, deserialize_with = "nullable")]
    pub templates: BTreeMap<String, TemplateConfig>,
    /// Commands by name.
    #[serde(default, deserialize_with = "nullable")]
    pub commands: BTreeMap<String, CommandConfig>,
}

/// A declared link, either `{ target, link }` or `[target, link]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "LinkEntry")]
pub struct LinkConfig {
    /// Path the link points to.
    pub target: String,
    /// Path of the link itself.
    pub link: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkEntry {
    Pair(String, String),
    Named(NamedLink),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedLink {
    target: String,
    link: String,
}

impl From<LinkEntry> for LinkConfig {
    fn from(entry: LinkEntry) -> Self {
        match entry {
            LinkEntry::Pair(target, link) | LinkEntry::Named(NamedLink { target, link }) => {
                Self { target, link }
            }
        }
    }
}

/// A declared template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Template source path.
    pub input: String,
    /// Rendered output path.
    pub output: String,
    /// Values available to the template.
    #[serde(default, deserialize_with = "nullable")]
    pub data: Mapping,
}

/// A declared command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// File the command reads.
    pub input: String,
    /// File the command must create.
    pub output: String,
    /// Shell command line with `{{.Input}}` and `{{.Output}}` placeholders.
    pub command: String,
}

/// Treat an explicit `null` (`links:` with nothing after it) as empty.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_instances<'de, D>(deserializer: D) -> Result<BTreeMap<String, Config>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<Config>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, config)| (name, config.unwrap_or_default()))
        .collect())
}

impl ConfigFile {
    /// Parse config text; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid YAML, unknown keys and
    /// malformed entries.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or a parse
    /// error as for [`parse`](Self::parse).
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Take the config of `instance` out of the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownInstance`] listing the defined
    /// instances if `instance` is not one of them.
    pub fn into_instance(mut self, instance: &str) -> Result<Config, ConfigError> {
        self.instances
            .remove(instance)
            .ok_or_else(|| ConfigError::UnknownInstance {
                instance: instance.to_string(),
                available: self.instances.into_keys().collect(),
            })
    }
}

impl Config {
    /// Load `instance` from the config file at `path` and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the instance
    /// does not exist, or an entry is invalid.
    pub fn load(path: &Path, instance: &str) -> Result<Self, ConfigError> {
        let config = ConfigFile::read(path)?.into_instance(instance)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject entries with empty names, paths or commands.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first offending entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, link) in &self.links {
            check_fields("link", name, &[("target", &link.target), ("link", &link.link)])?;
        }
        for (name, template) in &self.templates {
            check_fields(
                "template",
                name,
                &[("input", &template.input), ("output", &template.output)],
            )?;
        }
        for (name, command) in &self.commands {
            check_fields(
                "command",
                name,
                &[
                    ("input", &command.input),
                    ("output", &command.output),
                    ("command", &command.command),
                ],
            )?;
        }
        Ok(())
    }

    /// Whether the instance declares no units at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.templates.is_empty() && self.commands.is_empty()
    }
}

fn check_fields(kind: &'static str, name: &str, fields: &[(&str, &str)]) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::Invalid {
        kind,
        name: name.to_string(),
        message,
    };
    if name.trim().is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(invalid(format!("{field} must not be empty"))),
        None => Ok(()),
    }
}

/// Find the config file by searching `start` and its ancestors.
///
/// Every ancestor is searched for the first name in
/// [`CONFIG_FILE_NAMES`] before the next name is tried.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if no candidate exists.
pub fn discover(start: &Path) -> Result<PathBuf, ConfigError> {
    CONFIG_FILE_NAMES
        .iter()
        .find_map(|name| {
            find_entry_ascending(start, name, &[PathStatus::RegularFile, PathStatus::Symlink])
        })
        .ok_or_else(|| ConfigError::NotFound {
            names: CONFIG_FILE_NAMES.to_vec(),
            start: start.to_path_buf(),
        })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ConfigFile, ConfigError> {
        ConfigFile::parse(text, Path::new("deploy-configs.yml"))
    }

    #[test]
    fn selects_the_requested_instance() {
        let file = parse(
            "instances:\n  instance1:\n    commands:\n  instance2:\n    links:\n",
        )
        .unwrap();
        assert_eq!(file.instances.len(), 2);
        let config = file.into_instance("instance1").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn unknown_instance_lists_available() {
        let file = parse("instances:\n  instance1:\n  instance2:\n").unwrap();
        let err = file.into_instance("not-existent").unwrap_err();
        assert_eq!(
            err.to_string(),
            "There is no instance \"not-existent\" in [\"instance1\", \"instance2\"]"
        );
    }

    #[test]
    fn links_accept_both_forms() {
        let file = parse(
            r#"
instances:
  i:
    links:
      link1: ["./file1.txt", "./link1"]
      link2:
        target: "./file2.txt"
        link: "./link2"
"#,
        )
        .unwrap();
        let config = file.into_instance("i").unwrap();
        assert_eq!(
            config.links["link1"],
            LinkConfig {
                target: "./file1.txt".to_string(),
                link: "./link1".to_string(),
            }
        );
        assert_eq!(config.links["link2"].target, "./file2.txt");
        assert_eq!(config.links["link2"].link, "./link2");
    }

    #[test]
    fn link_list_must_have_two_elements() {
        let err = parse("instances:\n  i:\n    links:\n      l: [\"a\", \"b\", \"c\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn commands_and_templates_parse() {
        let file = parse(
            r#"
instances:
  i:
    commands:
      command1:
        input: "./file.txt"
        output: "~/file.txt"
        command: "seq 3"
    templates:
      template1:
        input: "./in.tmpl"
        output: "./out"
        data:
          var: 3
          nested: { key: value }
"#,
        )
        .unwrap();
        let config = file.into_instance("i").unwrap();
        let command = &config.commands["command1"];
        assert_eq!(command.input, "./file.txt");
        assert_eq!(command.output, "~/file.txt");
        assert_eq!(command.command, "seq 3");

        let template = &config.templates["template1"];
        assert_eq!(template.data.len(), 2);
        assert_eq!(template.data["var"], serde_yaml::Value::from(3));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse("instances:\n  i:\n    scripts:\n").unwrap_err();
        assert!(err.to_string().contains("scripts"));

        let err = parse(
            "instances:\n  i:\n    commands:\n      c:\n        input: a\n        output: b\n        command: c\n        timeout: 3\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let err = parse("instances:\n  i:\n    templates:\n      t:\n        input: a\n").unwrap_err();
        assert!(err.to_string().contains("output"));
    }

    #[test]
    fn empty_file_has_no_instances() {
        assert!(parse("").unwrap().instances.is_empty());
    }

    #[test]
    fn validate_rejects_empty_fields() {
        let mut config = Config::default();
        config.commands.insert(
            "gen".to_string(),
            CommandConfig {
                input: "in".to_string(),
                output: "out".to_string(),
                command: "  ".to_string(),
            },
        );
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid command \"gen\": command must not be empty");
    }

    #[test]
    fn validate_accepts_complete_entries() {
        let mut config = Config::default();
        config.links.insert(
            "a".to_string(),
            LinkConfig {
                target: "t".to_string(),
                link: "l".to_string(),
            },
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy-configs.yml");
        std::fs::write(&path, "instances:\n  i:\n    links:\n      a: [\"\", \"l\"]\n").unwrap();
        let err = Config::load(&path, "i").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { kind: "link", .. }));
    }

    #[test]
    fn load_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.yml"), "i").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn discover_searches_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("deploy-configs.yaml"), "").unwrap();

        assert_eq!(
            discover(&nested).unwrap(),
            dir.path().join("deploy-configs.yaml")
        );
    }

    #[test]
    fn discover_prefers_yml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("deploy-configs.yml"), "").unwrap();
        std::fs::write(dir.path().join("deploy-configs.yaml"), "").unwrap();
        assert_eq!(
            discover(dir.path()).unwrap(),
            dir.path().join("deploy-configs.yml")
        );
    }

    #[test]
    fn discover_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("inner");
        std::fs::create_dir_all(nested.join("deploy-configs.yml")).unwrap();
        std::fs::write(dir.path().join("deploy-configs.yml"), "").unwrap();
        assert_eq!(
            discover(&nested).unwrap(),
            dir.path().join("deploy-configs.yml")
        );
    }
}
