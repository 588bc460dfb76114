#![allow(clippy::float_cmp)]

use super::*;

fn center() -> Point {
    Point::new(400.0, 200.0)
}

// =============================================================
// Factories
// =============================================================

#[test]
fn add_furniture_centers_preset() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    let idx = reg.add_furniture(&presets, "sofa", center()).unwrap();
    assert_eq!(idx, 0);
    let sofa = reg.get(0).unwrap();
    assert_eq!(sofa.kind, EntityKind::Furniture);
    assert_eq!(sofa.type_key, "sofa");
    assert_eq!((sofa.x, sofa.y), (340.0, 170.0));
    assert_eq!((sofa.width, sofa.height), (120.0, 60.0));
    assert_eq!(sofa.angle, 0.0);
    assert_eq!(sofa.center(), center());
}

#[test]
fn add_device_sets_kind_and_zero_angle() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    reg.add_device(&presets, "ac", center()).unwrap();
    let ac = reg.get(0).unwrap();
    assert_eq!(ac.kind, EntityKind::Ac);
    assert_eq!(ac.type_key, "ac");
    assert_eq!(ac.angle, 0.0);
    assert_eq!(ac.label, "冷氣 ❄️");
}

#[test]
fn unknown_type_is_noop() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    assert!(reg.add_furniture(&presets, "piano", center()).is_none());
    assert!(reg.add_device(&presets, "heater", center()).is_none());
    assert!(reg.is_empty());
}

#[test]
fn factories_do_not_cross_kinds() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    assert!(reg.add_furniture(&presets, "fan", center()).is_none());
    assert!(reg.add_device(&presets, "bed", center()).is_none());
    assert_eq!(reg.len(), 0);
}

#[test]
fn add_furniture_at_uses_top_left() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    reg.add_furniture_at(&presets, "bed", 50.0, 150.0).unwrap();
    let bed = reg.get(0).unwrap();
    assert_eq!((bed.x, bed.y), (50.0, 150.0));
}

// =============================================================
// Ordering and queries
// =============================================================

#[test]
fn indices_follow_append_order() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    assert_eq!(reg.add_furniture(&presets, "sofa", center()), Some(0));
    assert_eq!(reg.add_device(&presets, "fan", center()), Some(1));
    assert_eq!(reg.add_furniture(&presets, "tv", center()), Some(2));
    let keys: Vec<&str> = reg.iter().map(|e| e.type_key.as_str()).collect();
    assert_eq!(keys, vec!["sofa", "fan", "tv"]);
}

#[test]
fn devices_filters_furniture() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    reg.add_furniture(&presets, "sofa", center());
    reg.add_device(&presets, "fan", center());
    reg.add_device(&presets, "ac", center());
    let idx: Vec<usize> = reg.devices().map(|(i, _)| i).collect();
    assert_eq!(idx, vec![1, 2]);
}

#[test]
fn clear_empties_registry() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    reg.add_furniture(&presets, "desk", center());
    reg.clear();
    assert!(reg.is_empty());
    assert!(reg.get(0).is_none());
}

// =============================================================
// Entity
// =============================================================

#[test]
fn well_formed_rejects_nan_angle() {
    let presets = Presets::builtin();
    let mut e = Entity::from_preset("fan", presets.get("fan").unwrap(), 0.0, 0.0);
    assert!(e.is_well_formed());
    e.angle = f64::NAN;
    assert!(!e.is_well_formed());
}

#[test]
fn well_formed_rejects_zero_width() {
    let presets = Presets::builtin();
    let mut e = Entity::from_preset("sofa", presets.get("sofa").unwrap(), 0.0, 0.0);
    e.width = 0.0;
    assert!(!e.is_well_formed());
}

#[test]
fn entity_serializes_wire_names() {
    let presets = Presets::builtin();
    let e = Entity::from_preset("tv", presets.get("tv").unwrap(), 1.0, 2.0);
    let v = serde_json::to_value(&e).unwrap();
    assert_eq!(v["type"], "tv");
    assert_eq!(v["kind"], "furniture");
    assert_eq!(v["w"], 100.0);
    assert_eq!(v["h"], 40.0);
}
