//! Integration tests for Settings loading with layered precedence.
//!
//! These tests only write local `.arbor.toml` files into temp directories;
//! a global config on the test machine would sit below them.

use std::fs;

use tempfile::TempDir;

use arbor::application::ApplicationError;
use arbor::config::{local_config_path, RenderStyle, Settings};
use arbor::OutlineStyle;

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.render.outline_style(), OutlineStyle::default());
}

#[test]
fn given_local_config_when_load_then_overrides_specified_fields_only() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
[render]
style = "tree"
prefix = "* "
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.render.style, RenderStyle::Tree);
    assert_eq!(settings.render.prefix, "* ");
    assert_eq!(settings.render.indent, 2, "indent keeps its default");
}

#[test]
fn given_zero_indent_in_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[render]\nindent = 0\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }), "{err}");
}

#[test]
fn given_malformed_local_config_when_load_then_error_names_file() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[render\nstyle = ").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains(".arbor.toml"), "{err}");
}

#[test]
fn given_template_when_parsed_then_valid_toml_with_defaults() {
    let template = Settings::template();
    let settings: Settings = toml::from_str(&template).expect("template parses");

    assert_eq!(settings, Settings::default());
}
