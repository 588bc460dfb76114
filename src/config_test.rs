use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_uses_defaults() {
    assert_eq!(ServiceConfig::from_lookup(lookup(&[])), ServiceConfig::default());
}

#[test]
fn values_are_read() {
    let cfg = ServiceConfig::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("STATIC_DIR", "/srv/roomflow"),
        ("ADVISOR_MAX_TOKENS", "512"),
    ]));
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.static_dir, PathBuf::from("/srv/roomflow"));
    assert_eq!(cfg.max_tokens, 512);
}

#[test]
fn bad_values_fall_back() {
    let cfg = ServiceConfig::from_lookup(lookup(&[("PORT", "eighty"), ("STATIC_DIR", "  "), ("ADVISOR_MAX_TOKENS", "-1")]));
    assert_eq!(cfg, ServiceConfig::default());
}
