use blogdigest::BlogRegistry;
use tempfile::tempdir;

#[test]
fn add_then_list_includes_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogs.json");

    let mut registry = BlogRegistry::load(&path);
    registry.add("Foo", "http://x/feed").unwrap();

    assert_eq!(registry.get("Foo"), Some("http://x/feed"));
    assert_eq!(registry.list().len(), 1);
}

#[test]
fn add_overwrites_existing_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogs.json");

    let mut registry = BlogRegistry::load(&path);
    registry.add("Foo", "http://x/feed").unwrap();
    registry.add("Foo", "http://y/feed").unwrap();

    assert_eq!(registry.get("Foo"), Some("http://y/feed"));
    assert_eq!(registry.list().len(), 1);
}

#[test]
fn remove_excludes_entry_and_tolerates_unknown_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogs.json");

    let mut registry = BlogRegistry::load(&path);
    registry.add("Foo", "http://x/feed").unwrap();
    assert!(registry.remove("Foo").unwrap());

    assert_eq!(registry.get("Foo"), None);
    assert!(registry.is_empty());

    // Removing a name that was never registered is a no-op, not an error,
    // and is reported as such.
    assert!(!registry.remove("Bar").unwrap());
}

#[test]
fn mutations_survive_a_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogs.json");

    let mut registry = BlogRegistry::load(&path);
    registry.add("Naver D2", "https://d2.naver.com/d2.atom").unwrap();
    registry.add("Gone", "http://gone/feed").unwrap();
    registry.remove("Gone").unwrap();

    let reloaded = BlogRegistry::load(&path);
    assert_eq!(reloaded.get("Naver D2"), Some("https://d2.naver.com/d2.atom"));
    assert_eq!(reloaded.get("Gone"), None);
    assert_eq!(reloaded.list().len(), 1);
}

#[test]
fn missing_file_loads_as_empty_registry() {
    let dir = tempdir().unwrap();
    let registry = BlogRegistry::load(dir.path().join("does-not-exist.json"));
    assert!(registry.is_empty());
}

#[test]
fn corrupt_file_loads_as_empty_registry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogs.json");
    std::fs::write(&path, "not json {{{").unwrap();

    let registry = BlogRegistry::load(&path);
    assert!(registry.is_empty());
}

#[test]
fn registry_file_is_plain_json_mapping() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blogs.json");

    let mut registry = BlogRegistry::load(&path);
    registry.add("Foo", "http://x/feed").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: std::collections::HashMap<String, String> =
        serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.get("Foo").map(String::as_str), Some("http://x/feed"));
}
