use std::io::Write as _;

use consolejs::{ConfigError, DEFAULT_MAX_STACK_SIZE, DEFAULT_MEMORY_LIMIT, ReplConfig};
use pretty_assertions::assert_eq;

#[test]
fn empty_document_is_the_default_config() {
    let config = ReplConfig::from_toml_str("").unwrap();
    assert_eq!(config, ReplConfig::default());
    assert_eq!(config.start_command, "js");
    assert_eq!(config.end_sentinel, "exit");
    assert_eq!(config.quit_sentinel, "qqq");
    assert_eq!(config.limits.memory_limit, DEFAULT_MEMORY_LIMIT);
    assert_eq!(config.limits.max_stack_size, DEFAULT_MAX_STACK_SIZE);
}

#[test]
fn only_named_keys_are_overridden() {
    let config = ReplConfig::from_toml_str(
        r#"
end_sentinel = ".end"
echo_input = false

[limits]
max_stack_size = 262144

[reserved_global]
name = "Player"
"#,
    )
    .unwrap();

    assert_eq!(config.end_sentinel, ".end");
    assert!(!config.echo_input);
    assert_eq!(config.start_command, "js");
    assert_eq!(config.limits.max_stack_size, 262_144);
    assert_eq!(config.limits.memory_limit, DEFAULT_MEMORY_LIMIT);
    assert_eq!(config.reserved_global.name, "Player");
    assert_eq!(config.reserved_global.value, "Hello from Skyrim!");
}

#[test]
fn unknown_keys_are_rejected() {
    let err = ReplConfig::from_toml_str("start_comand = \"js\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
}

#[test]
fn malformed_toml_is_rejected() {
    let err = ReplConfig::from_toml_str("end_sentinel = \n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "result_prefix = \"<- \"").unwrap();

    let config = ReplConfig::load(file.path()).unwrap();

    assert_eq!(config.result_prefix, "<- ");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ReplConfig::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { .. }), "got {err:?}");
    assert!(err.to_string().contains("absent.toml"));
}
