//! Template resource: render an input file against data, write only on change.
use serde_yaml::Mapping;
use std::path::PathBuf;

use super::fs::{self, PathStatus};
use super::{Applicable, ResourceChange, ResourceError, UnitKind};
use crate::template;

/// A template whose rendered output is owned by this resource.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateResource {
    /// Unit name, used for ordering and reporting.
    pub name: String,
    /// Template source file.
    pub input: PathBuf,
    /// Rendered destination.
    pub output: PathBuf,
    /// Values available to the template as `{{.key}}`.
    pub data: Mapping,
}

impl TemplateResource {
    /// Create a new template resource.
    #[must_use]
    pub fn new(name: impl Into<String>, input: PathBuf, output: PathBuf, data: Mapping) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            data,
        }
    }

    /// Render the input without touching the output.
    fn render(&self) -> Result<String, ResourceError> {
        if !matches!(
            fs::classify(&self.input),
            PathStatus::RegularFile | PathStatus::Symlink
        ) {
            return Err(ResourceError::InputMissing);
        }
        let source = std::fs::read_to_string(&self.input)
            .map_err(|e| ResourceError::io("read template", &self.input, e))?;
        Ok(template::render(&source, &self.data)?)
    }
}

impl Applicable for TemplateResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> UnitKind {
        UnitKind::Template
    }

    fn description(&self) -> String {
        let data = serde_json::to_string(&self.data).unwrap_or_else(|_| format!("{:?}", self.data));
        format!(
            "input: {:?}\noutput: {:?}\ndata: {data}",
            self.input, self.output
        )
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        let rendered = self.render()?;

        if fs::hash_bytes(rendered.as_bytes()) == fs::content_hash(&self.output) {
            return Ok(ResourceChange::AlreadyCorrect);
        }

        if let Some(parent) = self.output.parent() {
            fs::ensure_directory(parent)
                .map_err(|e| ResourceError::io("create directory", parent, e))?;
        }

        // Never write through a link into a file some other unit owns.
        if fs::classify(&self.output) == PathStatus::Symlink {
            fs::remove_entry(&self.output)
                .map_err(|e| ResourceError::io("replace output link", &self.output, e))?;
        }

        std::fs::write(&self.output, rendered)
            .map_err(|e| ResourceError::io("write output", &self.output, e))?;
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::template::{TemplateError, data_from_pairs};

    fn setup(body: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.tmpl");
        std::fs::write(&input, body).unwrap();
        let output = dir.path().join("out").join("rendered");
        (dir, input, output)
    }

    #[test]
    fn renders_then_skips_when_unchanged() {
        let (_dir, input, output) = setup("{{.var1}} {{.var2}}");
        let data = data_from_pairs([("var1", "value1"), ("var2", "value2")]);
        let resource = TemplateResource::new("t", input, output.clone(), data);

        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "value1 value2");

        let before = std::fs::metadata(&output).unwrap().modified().unwrap();
        assert_eq!(resource.apply().unwrap(), ResourceChange::AlreadyCorrect);
        let after = std::fs::metadata(&output).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn overwrites_stale_output_in_place() {
        let (_dir, input, output) = setup("new {{.v}}");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();
        std::fs::write(&output, "old").unwrap();
        let resource = TemplateResource::new("t", input, output.clone(), data_from_pairs([("v", "1")]));

        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "new 1");
    }

    #[test]
    fn missing_input_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let resource = TemplateResource::new(
            "t",
            dir.path().join("missing.tmpl"),
            output.clone(),
            Mapping::new(),
        );
        assert!(matches!(resource.apply(), Err(ResourceError::InputMissing)));
        assert_eq!(fs::classify(&output), PathStatus::Absent);
    }

    #[test]
    fn directory_input_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let resource = TemplateResource::new(
            "t",
            dir.path().to_path_buf(),
            dir.path().join("out"),
            Mapping::new(),
        );
        assert!(matches!(resource.apply(), Err(ResourceError::InputMissing)));
    }

    #[test]
    fn missing_key_fails_and_leaves_output_alone() {
        let (_dir, input, output) = setup("{{.missingVar}}");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();
        std::fs::write(&output, "previous").unwrap();
        let resource = TemplateResource::new("t", input, output.clone(), Mapping::new());

        let err = resource.apply().unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Template(TemplateError::MissingKey { .. })
        ));
        assert!(err.to_string().contains("missingVar"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
    }

    #[cfg(unix)]
    #[test]
    fn output_symlink_is_replaced_by_plain_file() {
        let (dir, input, output) = setup("fresh");
        let owned_elsewhere = dir.path().join("other-owner");
        std::fs::write(&owned_elsewhere, "keep me").unwrap();
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&owned_elsewhere, &output).unwrap();

        let resource = TemplateResource::new("t", input, output.clone(), Mapping::new());
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);

        assert_eq!(fs::classify(&output), PathStatus::RegularFile);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "fresh");
        assert_eq!(std::fs::read_to_string(&owned_elsewhere).unwrap(), "keep me");
    }

    #[test]
    fn description_includes_data() {
        let resource = TemplateResource::new(
            "t",
            PathBuf::from("/in"),
            PathBuf::from("/out"),
            data_from_pairs([("var1", "value1")]),
        );
        assert_eq!(
            resource.description(),
            "input: \"/in\"\noutput: \"/out\"\ndata: {\"var1\":\"value1\"}"
        );
    }
}
