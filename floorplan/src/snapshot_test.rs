#![allow(clippy::float_cmp)]

use std::f64::consts::FRAC_PI_4;

use serde_json::json;

use super::*;
use crate::preset::Presets;
use crate::viewport::Point;

fn scene() -> (Registry, Viewport) {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    reg.add_furniture_at(&presets, "sofa", 10.4, 20.5).unwrap();
    let fan = reg.add_device(&presets, "fan", Point::new(200.0, 100.0)).unwrap();
    reg.get_mut(fan).unwrap().angle = FRAC_PI_4;
    (reg, Viewport::new(800.4, 600.6, 2.0))
}

// =============================================================
// Capture
// =============================================================

#[test]
fn capture_rounds_geometry_and_angle() {
    let (reg, vp) = scene();
    let snap = SceneSnapshot::capture(&reg, &vp, 24.0, "studio");

    assert_eq!(snap.ac_temp, 24.0);
    assert_eq!(snap.room_template, "studio");
    assert_eq!(snap.canvas_size, CanvasSize { width: 800.0, height: 601.0 });
    assert_eq!(snap.items.len(), 2);

    let sofa = &snap.items[0];
    assert_eq!(sofa.type_key, "sofa");
    assert_eq!(sofa.kind, EntityKind::Furniture);
    assert_eq!((sofa.x, sofa.y, sofa.w, sofa.h), (10.0, 21.0, 120.0, 60.0));
    assert_eq!(sofa.angle, 0.0);

    let fan = &snap.items[1];
    assert_eq!(fan.kind, EntityKind::Fan);
    assert_eq!(fan.angle, 0.785);
}

#[test]
fn capture_rounds_half_toward_positive_infinity() {
    let presets = Presets::builtin();
    let mut reg = Registry::new();
    reg.add_furniture_at(&presets, "tv", -2.5, 2.5).unwrap();
    let snap = SceneSnapshot::capture(&reg, &Viewport::default(), DEFAULT_AC_TEMP, "custom");
    assert_eq!((snap.items[0].x, snap.items[0].y), (-2.0, 3.0));
}

#[test]
fn snapshot_serializes_wire_names() {
    let (reg, vp) = scene();
    let value = serde_json::to_value(SceneSnapshot::capture(&reg, &vp, 26.0, "custom")).unwrap();
    assert_eq!(value["canvas_size"], json!({ "width": 800.0, "height": 601.0 }));
    assert_eq!(value["items"][0]["type"], "sofa");
    assert_eq!(value["items"][1]["kind"], "fan");
    assert_eq!(value["items"][1]["w"], 70.0);
}

#[test]
fn posted_fractional_geometry_is_accepted() {
    let snap: SceneSnapshot = serde_json::from_str(
        r#"{"canvas_size":{"width":640.5,"height":480},"items":[{"type":"sofa","kind":"furniture","x":1.5,"y":2,"w":3,"h":4}]}"#,
    )
    .unwrap();
    assert_eq!(snap.canvas_size, CanvasSize { width: 640.5, height: 480.0 });
    let sofa = &snap.items[0];
    assert_eq!((sofa.x, sofa.y, sofa.w, sofa.h), (1.5, 2.0, 3.0, 4.0));
    assert_eq!(sofa.angle, 0.0);
}

#[test]
fn missing_fields_take_defaults() {
    let snap: SceneSnapshot = serde_json::from_str("{}").unwrap();
    assert_eq!(snap.ac_temp, 26.0);
    assert_eq!(snap.room_template, "custom");
    assert!(snap.items.is_empty());
}

// =============================================================
// Metrics
// =============================================================

#[test]
fn metric_levels_follow_thresholds() {
    assert_eq!(MetricLevel::from_value(0.0), MetricLevel::Low);
    assert_eq!(MetricLevel::from_value(39.9), MetricLevel::Low);
    assert_eq!(MetricLevel::from_value(40.0), MetricLevel::Mid);
    assert_eq!(MetricLevel::from_value(69.9), MetricLevel::Mid);
    assert_eq!(MetricLevel::from_value(70.0), MetricLevel::High);
    assert_eq!(MetricLevel::from_value(-5.0), MetricLevel::Mid);
    assert_eq!(MetricLevel::from_value(f64::NAN), MetricLevel::High);
    assert_eq!(MetricLevel::High.css_class(), "metric-high");
}

#[test]
fn energy_words_map_to_scores() {
    assert_eq!(EnergyIndex::Level("低".into()).value(), 25.0);
    assert_eq!(EnergyIndex::Level("中".into()).value(), 60.0);
    assert_eq!(EnergyIndex::Level("高".into()).value(), 85.0);
    assert_eq!(EnergyIndex::Level("unknown".into()).value(), 60.0);
    assert_eq!(EnergyIndex::Score(12.0).value(), 12.0);
}

#[test]
fn metrics_accept_legacy_keys() {
    let m: Metrics = serde_json::from_value(json!({
        "舒適度評分": 82,
        "能耗指數": "低",
        "氣流效率": 55.5,
        "建議冷氣溫度": 26
    }))
    .unwrap();
    assert_eq!(m.comfort_score, Some(82.0));
    assert_eq!(m.energy_index, Some(EnergyIndex::Level("低".into())));
    assert_eq!(m.airflow_efficiency, Some(55.5));
    assert_eq!(m.recommended_ac_temp, Some(26.0));
}

#[test]
fn english_key_wins_over_legacy_duplicate() {
    let value = json!({ "comfort_score": 80, "舒適度評分": 70, "能耗指數": "高" });
    let m = Metrics::from_object(value.as_object().unwrap()).unwrap();
    assert_eq!(m.comfort_score, Some(80.0));
    assert_eq!(m.energy_index, Some(EnergyIndex::Level("高".into())));
}

#[test]
fn wrongly_typed_metric_is_an_error() {
    let value = json!({ "comfort_score": "very" });
    assert!(Metrics::from_object(value.as_object().unwrap()).is_err());
}

#[test]
fn readouts_skip_missing_and_band_values() {
    let m = Metrics {
        comfort_score: Some(30.0),
        energy_index: Some(EnergyIndex::Level("高".into())),
        airflow_efficiency: None,
        recommended_ac_temp: Some(25.0),
    };
    let r = m.readouts();
    assert_eq!(r.len(), 3);
    assert_eq!(r[0], Readout { field: MetricField::Comfort, text: "30".into(), level: Some(MetricLevel::Low) });
    assert_eq!(r[1].text, "高");
    assert_eq!(r[1].level, Some(MetricLevel::High));
    assert_eq!(r[2], Readout { field: MetricField::RecommendedTemp, text: "25°C".into(), level: None });
}

// =============================================================
// Suggestions
// =============================================================

#[test]
fn response_tolerates_missing_fields() {
    let resp: SuggestionResponse = serde_json::from_str(r#"{"suggestions":["a","b"]}"#).unwrap();
    assert_eq!(resp.suggestions, vec!["a", "b"]);
    assert!(resp.metrics.is_none());
    assert!(resp.error.is_none());
}

#[test]
fn empty_suggestions_show_placeholder() {
    let result: Result<SuggestionResponse, String> = Ok(SuggestionResponse::default());
    assert_eq!(suggestion_lines(&result), vec![EMPTY_SUGGESTIONS_LINE.to_owned()]);
}

#[test]
fn suggestions_pass_through() {
    let resp = SuggestionResponse { suggestions: vec!["move the fan".into()], ..Default::default() };
    let result: Result<_, String> = Ok(resp);
    assert_eq!(suggestion_lines(&result), vec!["move the fan".to_owned()]);
}

#[test]
fn failure_becomes_single_error_line() {
    let result: Result<SuggestionResponse, String> = Err("timeout".into());
    assert_eq!(suggestion_lines(&result), vec!["產生建議時發生錯誤：timeout".to_owned()]);
}
