//! Conversion of a validated [`Config`] into the units of one run.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Config, PathExpander};
use crate::error::ConfigError;
use crate::exec::Executor;
use crate::resources::command::CommandResource;
use crate::resources::fs::normalize_lexically;
use crate::resources::symlink::SymlinkResource;
use crate::resources::template::TemplateResource;

/// Every unit of one run, with paths expanded and made absolute.
#[derive(Debug, Default)]
pub struct DeployPlan {
    /// Declared links, before directory fan-out.
    pub links: Vec<SymlinkResource>,
    /// Declared templates.
    pub templates: Vec<TemplateResource>,
    /// Declared commands.
    pub commands: Vec<CommandResource>,
}

impl DeployPlan {
    /// Build the plan for `config`.
    ///
    /// Path fields are expanded with `expander`; relative results are
    /// resolved against `base_dir`.  Command lines are kept as written,
    /// their placeholders are filled in when the command runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Expand`] for the first path that cannot be
    /// expanded.
    pub fn from_config(
        config: &Config,
        expander: &PathExpander,
        base_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let resolve = |kind: &'static str, name: &str, field: &'static str, raw: &str| {
            let expanded = expander.expand(raw).map_err(|source| ConfigError::Expand {
                kind,
                name: name.to_string(),
                field,
                source,
            })?;
            Ok::<PathBuf, ConfigError>(normalize_lexically(&base_dir.join(expanded)))
        };

        let links = config
            .links
            .iter()
            .map(|(name, link)| -> Result<SymlinkResource, ConfigError> {
                Ok(SymlinkResource::new(
                    name.as_str(),
                    resolve("link", name, "target", &link.target)?,
                    resolve("link", name, "link", &link.link)?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let templates = config
            .templates
            .iter()
            .map(|(name, template)| -> Result<TemplateResource, ConfigError> {
                Ok(TemplateResource::new(
                    name.as_str(),
                    resolve("template", name, "input", &template.input)?,
                    resolve("template", name, "output", &template.output)?,
                    template.data.clone(),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let commands = config
            .commands
            .iter()
            .map(|(name, command)| -> Result<CommandResource, ConfigError> {
                Ok(CommandResource::new(
                    name.as_str(),
                    resolve("command", name, "input", &command.input)?,
                    resolve("command", name, "output", &command.output)?,
                    command.command.as_str(),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            links,
            templates,
            commands,
        })
    }

    /// Run every command through `executor` instead of the system shell.
    #[must_use]
    pub fn with_executor(mut self, executor: &Arc<dyn Executor>) -> Self {
        self.commands = self
            .commands
            .into_iter()
            .map(|command| command.with_executor(Arc::clone(executor)))
            .collect();
        self
    }

    /// Number of declared units (links counted before fan-out).
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.links.len() + self.templates.len() + self.commands.len()
    }
}
