use super::*;

#[test]
fn overwrite_replaces_and_keeps_position() {
    let mut d = OptionDict::new();
    d.set("b", "1M", SetMode::Overwrite);
    d.set("g", "250", SetMode::Overwrite);
    d.set("b", "2M", SetMode::Overwrite);
    assert_eq!(d.get("b"), Some("2M"));
    assert_eq!(d.len(), 2);
    let keys: Vec<&str> = d.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["b", "g"]);
}

#[test]
fn append_concatenates_without_delimiter() {
    let mut d = OptionDict::new();
    d.set("flags", "+bitexact", SetMode::Append);
    d.set("flags", "+gray", SetMode::Append);
    assert_eq!(d.get("flags"), Some("+bitexact+gray"));
}

#[test]
fn remove_and_lookup() {
    let mut d: OptionDict = [("a", "1"), ("b", "2")].into_iter().collect();
    assert!(d.contains_key("a"));
    assert_eq!(d.remove("a").as_deref(), Some("1"));
    assert!(!d.contains_key("a"));
    assert_eq!(d.remove("a"), None);
    assert!(!d.is_empty());
}

#[test]
fn serializes_as_ordered_json_object() {
    let d: OptionDict = [("z", "1"), ("a", "2")].into_iter().collect();
    assert_eq!(serde_json::to_string(&d).unwrap(), r#"{"z":"1","a":"2"}"#);
}
