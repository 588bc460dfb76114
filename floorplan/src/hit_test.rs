use super::*;
use crate::preset::Presets;

fn registry_with(items: &[(&str, f64, f64)]) -> Registry {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    for (key, x, y) in items {
        let preset = presets.get(key).unwrap();
        let center = Point::new(x + preset.width / 2.0, y + preset.height / 2.0);
        if preset.kind.is_device() {
            reg.add_device(&presets, key, center).unwrap();
        } else {
            reg.add_furniture(&presets, key, center).unwrap();
        }
    }
    reg
}

// =============================================================
// contains
// =============================================================

#[test]
fn contains_interior_point() {
    let reg = registry_with(&[("sofa", 0.0, 0.0)]);
    assert!(contains(reg.get(0).unwrap(), Point::new(60.0, 30.0)));
}

#[test]
fn contains_edges_inclusive() {
    let reg = registry_with(&[("sofa", 10.0, 20.0)]);
    let sofa = reg.get(0).unwrap();
    assert!(contains(sofa, Point::new(10.0, 20.0)));
    assert!(contains(sofa, Point::new(130.0, 80.0)));
    assert!(!contains(sofa, Point::new(130.01, 80.0)));
    assert!(!contains(sofa, Point::new(9.99, 50.0)));
}

#[test]
fn contains_ignores_rotation() {
    let mut reg = registry_with(&[("ac", 0.0, 0.0)]);
    reg.get_mut(0).unwrap().angle = std::f64::consts::FRAC_PI_2;
    // A corner of the unrotated box stays hittable even though the rotated
    // body no longer covers it.
    assert!(contains(reg.get(0).unwrap(), Point::new(119.0, 1.0)));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_test_empty_registry_is_none() {
    assert_eq!(hit_test(Point::new(0.0, 0.0), &Registry::new()), None);
}

#[test]
fn hit_test_miss_is_none() {
    let reg = registry_with(&[("table", 0.0, 0.0)]);
    assert_eq!(hit_test(Point::new(500.0, 500.0), &reg), None);
}

#[test]
fn hit_test_top_most_wins() {
    let reg = registry_with(&[("sofa", 0.0, 0.0), ("table", 50.0, 20.0)]);
    // Overlap region belongs to both; the later one wins.
    assert_eq!(hit_test(Point::new(60.0, 30.0), &reg), Some(1));
    // Only the first covers this point.
    assert_eq!(hit_test(Point::new(5.0, 5.0), &reg), Some(0));
}

#[test]
fn hit_test_three_way_overlap_returns_last() {
    let reg = registry_with(&[("bed", 0.0, 0.0), ("fan", 10.0, 10.0), ("desk", 20.0, 20.0)]);
    assert_eq!(hit_test(Point::new(30.0, 30.0), &reg), Some(2));
}
