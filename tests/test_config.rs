use std::path::PathBuf;
use std::time::Duration;

use webviewer::config::{Config, PORT_ENV, ROOT_ENV};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.root, PathBuf::from("."));
    assert_eq!(cfg.backlog, 50);
    assert_eq!(cfg.read_buffer_size, 8192);
    assert_eq!(cfg.watch_debounce(), Some(Duration::from_millis(100)));
}

#[test]
fn test_config_from_partial_yaml() {
    let cfg = Config::from_yaml("port: 9000\nroot: ./build\n").unwrap();

    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.root, PathBuf::from("./build"));
    assert_eq!(cfg.backlog, 50);
}

#[test]
fn test_config_from_empty_yaml() {
    let cfg = Config::from_yaml("  \n").unwrap();
    assert_eq!(cfg.port, 8080);
}

#[test]
fn test_config_rejects_bad_yaml() {
    assert!(Config::from_yaml("port: not-a-number\n").is_err());
}

#[test]
fn test_config_watch_disabled() {
    let cfg = Config::from_yaml("watch: false\n").unwrap();
    assert_eq!(cfg.watch_debounce(), None);
}

#[test]
fn test_config_watch_debounce() {
    let cfg = Config::from_yaml("watch_debounce_ms: 250\n").unwrap();
    assert_eq!(cfg.watch_debounce(), Some(Duration::from_millis(250)));
}

#[test]
fn test_config_env_overrides() {
    let cfg = Config::default()
        .with_overrides(|key| match key {
            k if k == PORT_ENV => Some("4321".to_string()),
            k if k == ROOT_ENV => Some("/srv/site".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(cfg.port, 4321);
    assert_eq!(cfg.root, PathBuf::from("/srv/site"));
}

#[test]
fn test_config_no_overrides_keeps_values() {
    let cfg = Config::from_yaml("port: 9000\n").unwrap().with_overrides(no_env).unwrap();
    assert_eq!(cfg.port, 9000);
}

#[test]
fn test_config_invalid_port_override() {
    let result = Config::default().with_overrides(|key| {
        (key == PORT_ENV).then(|| "70000".to_string())
    });

    assert!(result.is_err());
}
