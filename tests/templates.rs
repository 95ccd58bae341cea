#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for template expansion.

mod common;

use common::{TestRepo, headlines};
use deploy_configs::logging::LogLevel;

const CONFIG: &str = r#"
instances:
  home:
    templates:
      conf:
        input: "{{.GitRoot}}/conf.tmpl"
        output: "{{.GitRoot}}/out/conf"
        data:
          var1: value1
          var2: value2
"#;

#[test]
fn expands_variables_into_output() {
    let repo = TestRepo::new();
    repo.write_file("conf.tmpl", "{{.var1}} {{.var2}}");
    repo.write_config(CONFIG);

    let (ok, log) = repo.deploy("home");

    assert!(ok);
    assert_eq!(repo.read("out/conf"), "value1 value2");
    assert_eq!(headlines(&log, LogLevel::Success), vec!["Template \"conf\" expanded:"]);
}

#[test]
fn rewrites_outdated_output() {
    let repo = TestRepo::new();
    repo.write_file("conf.tmpl", "{{.var1}}");
    repo.write_file("out/conf", "stale");
    repo.write_config(CONFIG);

    let (ok, log) = repo.deploy("home");

    assert!(ok);
    assert_eq!(repo.read("out/conf"), "value1");
    assert_eq!(log.messages(LogLevel::Success).len(), 1);
}

#[test]
fn identical_output_is_skipped() {
    let repo = TestRepo::new();
    repo.write_file("conf.tmpl", "{{.var1}}");
    repo.write_file("out/conf", "value1");
    repo.write_config(CONFIG);

    let (ok, log) = repo.deploy("home");

    assert!(ok);
    assert_eq!(headlines(&log, LogLevel::Skip), vec!["Template \"conf\" is skipped"]);
}

#[test]
fn missing_variable_fails_without_output() {
    let repo = TestRepo::new();
    repo.write_file("conf.tmpl", "{{.missingVar}}");
    repo.write_config(CONFIG);

    let (ok, log) = repo.deploy("home");

    assert!(!ok);
    assert_eq!(
        headlines(&log, LogLevel::Fail),
        vec!["Unable to expand \"conf\" template:"]
    );
    assert!(log.contains(LogLevel::Fail, "missingVar"));
    assert!(!repo.join("out/conf").exists());
}

#[test]
fn missing_input_fails() {
    let repo = TestRepo::new();
    repo.write_config(CONFIG);

    let (ok, log) = repo.deploy("home");

    assert!(!ok);
    assert!(log.contains(LogLevel::Fail, "error: input file doesn't exist"));
    assert!(!repo.join("out/conf").exists());
}

#[test]
fn conditionals_and_loops_render_from_instance_data() {
    let repo = TestRepo::new();
    repo.write_file(
        "theme.tmpl",
        "theme = {{if .dark}}dark{{else}}light{{end}}\n\
         {{- range .fonts }}\nfont = {{ . }}\n{{- end }}\n\
         {{ with .cursor }}cursor = {{ .size }}{{ end }}\n",
    );
    repo.write_config(
        r#"
instances:
  home:
    templates:
      theme:
        input: "{{.GitRoot}}/theme.tmpl"
        output: "{{.GitRoot}}/out/theme"
        data:
          dark: true
          fonts: [Iosevka, Inter]
          cursor: { size: 24 }
"#,
    );

    let (ok, _log) = repo.deploy("home");

    assert!(ok);
    assert_eq!(
        repo.read("out/theme"),
        "theme = dark\nfont = Iosevka\nfont = Inter\ncursor = 24\n"
    );
}
