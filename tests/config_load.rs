//! End-to-end configuration loading against isolated registries.

mod common;

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use livecfg::config::{load_from_document, load_from_path, ConfigError};
use livecfg::{Node, Registry};

const DOC: &str = "\
system:
  port: 9900
  hosts: [alpha, beta, alpha]
  limits:
    cpu: [1, 2]
    mem: [512]
";

#[test]
fn test_yaml_file_updates_entries_and_listeners() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "app.yml", DOC);

    let registry = Registry::new();
    let port = registry.lookup_or_create("system.port", 8080i32, "port").unwrap();
    let hosts = registry
        .lookup_or_create("system.hosts", HashSet::<String>::new(), "hosts")
        .unwrap();
    let limits = registry
        .lookup_or_create("system.limits", BTreeMap::<String, Vec<u32>>::new(), "limits")
        .unwrap();

    let changes = Arc::new(Mutex::new(Vec::new()));
    let seen = changes.clone();
    port.add_listener(1, move |old, new| seen.lock().unwrap().push((*old, *new)));

    let report = load_from_path(&registry, &path).unwrap();
    assert_eq!(report.failed, 0);
    assert_eq!(report.applied, 3);

    assert_eq!(port.value(), 9900);
    assert_eq!(hosts.value(), HashSet::from(["alpha".to_string(), "beta".to_string()]));
    assert_eq!(limits.value().get("cpu"), Some(&vec![1, 2]));
    assert_eq!(*changes.lock().unwrap(), vec![(8080, 9900)]);

    // Loading the same file again changes nothing.
    load_from_path(&registry, &path).unwrap();
    assert_eq!(changes.lock().unwrap().len(), 1);
}

#[test]
fn test_flattening_order_reaches_parent_and_child_entries() {
    let registry = Registry::new();
    let parent = registry
        .lookup_or_create("system.limits", BTreeMap::<String, Vec<u32>>::new(), "")
        .unwrap();
    let child = registry.lookup_or_create("system.limits.mem", vec![0u32], "").unwrap();

    let order = Arc::new(Mutex::new(Vec::new()));
    let (a, b) = (order.clone(), order.clone());
    parent.add_listener(1, move |_, _| a.lock().unwrap().push("parent"));
    child.add_listener(1, move |_, _| b.lock().unwrap().push("child"));

    load_from_document(&registry, &Node::parse(DOC).unwrap());
    assert_eq!(*order.lock().unwrap(), vec!["parent", "child"]);
    assert_eq!(child.value(), vec![512]);
}

#[test]
fn test_invalid_paths_do_not_stop_the_load() {
    let registry = Registry::new();
    let port = registry.lookup_or_create("system.port", 1i32, "").unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    port.add_listener(1, move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let doc = "bad key!:\n  port: 5\nsystem:\n  port: 7\n";
    load_from_document(&registry, &Node::parse(doc).unwrap());
    assert_eq!(port.value(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_toml_and_yaml_agree() {
    let dir = tempfile::tempdir().unwrap();
    let yaml = common::write_config(dir.path(), "a.yaml", "system:\n  hosts: [x, y]\n");
    let toml = common::write_config(dir.path(), "a.toml", "[system]\nhosts = [\"x\", \"y\"]\n");

    for path in [yaml, toml] {
        let registry = Registry::new();
        let hosts = registry.lookup_or_create("system.hosts", Vec::<String>::new(), "").unwrap();
        load_from_path(&registry, &path).unwrap();
        assert_eq!(hosts.value(), vec!["x", "y"]);
    }
}

#[test]
fn test_registry_errors() {
    let registry = Registry::new();
    assert!(matches!(
        registry.lookup_or_create("Bad Name!", 0i32, ""),
        Err(ConfigError::InvalidName(_))
    ));

    registry.lookup_or_create("a.b", 1i32, "").unwrap();
    assert!(matches!(
        registry.lookup_or_create("a.b", "x".to_string(), ""),
        Err(ConfigError::TypeMismatch { .. })
    ));
}

#[test]
fn test_malformed_document_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), "broken.yml", "system: [1, 2\n");
    let registry = Registry::new();
    assert!(matches!(load_from_path(&registry, &path), Err(ConfigError::Document(_))));
}
