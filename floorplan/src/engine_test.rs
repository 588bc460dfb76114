#![allow(clippy::float_cmp)]

use std::f64::consts::FRAC_PI_4;

use super::*;
use crate::preset::EntityKind;

// =============================================================
// Helpers
// =============================================================

fn core() -> EngineCore {
    let mut core = EngineCore::new(EngineConfig { seed: Some(7), ..Default::default() });
    core.set_viewport(800.0, 600.0, 1.0);
    core
}

fn clamped_core() -> EngineCore {
    let mut core = EngineCore::new(EngineConfig { clamp_drag: true, seed: Some(7), ..Default::default() });
    core.set_viewport(800.0, 600.0, 1.0);
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn cursor(name: &str) -> Action {
    Action::SetCursor(name.to_owned())
}

fn click(core: &mut EngineCore, at: Point) -> Vec<Action> {
    core.on_pointer_down(at);
    core.on_pointer_up(at)
}

fn drag(core: &mut EngineCore, from: Point, dx: f64, dy: f64) {
    core.on_pointer_down(from);
    core.on_pointer_move(pt(from.x + dx, from.y + dy));
    core.on_pointer_up(pt(from.x + dx, from.y + dy));
}

// =============================================================
// Factories
// =============================================================

#[test]
fn add_furniture_centers_in_viewport() {
    let mut core = core();
    let idx = core.add_furniture("table").unwrap();
    let table = core.entity(idx).unwrap();
    assert_eq!(table.center(), pt(400.0, 300.0));
    assert_eq!(table.angle, 0.0);
}

#[test]
fn add_device_sets_kind() {
    let mut core = core();
    let idx = core.add_device("ac").unwrap();
    assert_eq!(core.entity(idx).unwrap().kind, EntityKind::Ac);
}

#[test]
fn unknown_types_are_noops() {
    let mut core = core();
    assert!(core.add_furniture("piano").is_none());
    assert!(core.add_device("heater").is_none());
    assert!(core.add_furniture("fan").is_none());
    assert!(core.add_device("sofa").is_none());
    assert!(core.registry.is_empty());
}

#[test]
fn add_follows_resized_viewport() {
    let mut core = core();
    core.set_viewport(200.0, 100.0, 2.0);
    let idx = core.add_device("fan").unwrap();
    assert_eq!(core.entity(idx).unwrap().center(), pt(100.0, 50.0));
}

#[test]
fn clear_drops_entities_particles_and_session() {
    let mut core = core();
    core.add_device("fan");
    core.step();
    core.on_pointer_down(pt(400.0, 300.0));
    core.clear();
    assert!(core.registry.is_empty());
    assert!(core.particles.is_empty());
    assert_eq!(core.input, InputState::Idle);
}

// =============================================================
// Pointer down
// =============================================================

#[test]
fn press_on_empty_space_stays_idle() {
    let mut core = core();
    core.add_furniture("sofa");
    let actions = core.on_pointer_down(pt(5.0, 5.0));
    assert_eq!(core.input, InputState::Idle);
    assert_eq!(actions, vec![cursor("default")]);
}

#[test]
fn press_records_offset_from_top_left() {
    let mut core = core();
    core.add_furniture("sofa"); // top-left (340, 270)
    let actions = core.on_pointer_down(pt(350.0, 280.0));
    assert_eq!(
        core.input,
        InputState::Pressed { index: 0, offset: pt(10.0, 10.0), press: pt(350.0, 280.0) }
    );
    assert_eq!(actions, vec![cursor("grabbing")]);
}

#[test]
fn press_picks_top_most() {
    let mut core = core();
    core.add_furniture("sofa");
    core.add_furniture("table");
    core.on_pointer_down(pt(400.0, 300.0));
    assert_eq!(core.input.held(), Some(1));
}

// =============================================================
// Click to rotate
// =============================================================

#[test]
fn click_rotates_device_by_45_degrees() {
    let mut core = core();
    core.add_device("fan");
    let actions = click(&mut core, pt(400.0, 300.0));
    assert!((core.entity(0).unwrap().angle - FRAC_PI_4).abs() < 1e-12);
    assert_eq!(actions[0], Action::EntityRotated { index: 0, angle: FRAC_PI_4 });
    assert_eq!(actions[1], cursor("grab"));
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn repeated_clicks_accumulate() {
    let mut core = core();
    core.add_device("ac");
    for _ in 0..3 {
        click(&mut core, pt(400.0, 300.0));
    }
    assert!((core.entity(0).unwrap().angle - 3.0 * FRAC_PI_4).abs() < 1e-12);
}

#[test]
fn click_on_furniture_does_not_rotate() {
    let mut core = core();
    core.add_furniture("bed");
    let actions = click(&mut core, pt(400.0, 300.0));
    assert_eq!(core.entity(0).unwrap().angle, 0.0);
    assert_eq!(actions, vec![cursor("grab")]);
}

#[test]
fn rotation_fires_even_when_released_elsewhere() {
    let mut core = core();
    core.add_device("fan");
    core.on_pointer_down(pt(400.0, 300.0));
    let actions = core.on_pointer_up(pt(10.0, 10.0));
    assert_eq!(core.entity(0).unwrap().angle, FRAC_PI_4);
    assert_eq!(actions.last(), Some(&cursor("default")));
}

#[test]
fn cancel_behaves_like_release() {
    let mut core = core();
    core.add_device("fan");
    core.on_pointer_down(pt(400.0, 300.0));
    core.on_pointer_cancel(pt(400.0, 300.0));
    assert_eq!(core.entity(0).unwrap().angle, FRAC_PI_4);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn release_without_press_is_harmless() {
    let mut core = core();
    core.add_device("fan");
    let actions = core.on_pointer_up(pt(400.0, 300.0));
    assert_eq!(core.entity(0).unwrap().angle, 0.0);
    assert_eq!(actions, vec![cursor("grab")]);
}

// =============================================================
// Drag
// =============================================================

#[test]
fn drag_moves_by_pointer_delta() {
    let mut core = core();
    core.add_furniture("sofa"); // top-left (340, 270)
    drag(&mut core, pt(350.0, 280.0), 30.0, -15.0);
    let sofa = core.entity(0).unwrap();
    assert_eq!((sofa.x, sofa.y), (370.0, 255.0));
    assert_eq!(sofa.angle, 0.0);
}

#[test]
fn drag_reports_moves_and_enters_dragging() {
    let mut core = core();
    core.add_furniture("sofa");
    core.on_pointer_down(pt(350.0, 280.0));
    let actions = core.on_pointer_move(pt(351.0, 281.0));
    assert_eq!(actions, vec![Action::EntityMoved { index: 0, x: 341.0, y: 271.0 }]);
    assert!(core.input.moved());
}

#[test]
fn drag_then_release_never_rotates_device() {
    let mut core = core();
    core.add_device("fan");
    core.on_pointer_down(pt(400.0, 300.0));
    core.on_pointer_move(pt(401.0, 300.0));
    let actions = core.on_pointer_up(pt(401.0, 300.0));
    assert_eq!(core.entity(0).unwrap().angle, 0.0);
    assert!(!actions.iter().any(|a| matches!(a, Action::EntityRotated { .. })));
}

#[test]
fn move_back_to_press_point_still_counts_as_drag() {
    let mut core = core();
    core.add_device("fan");
    core.on_pointer_down(pt(400.0, 300.0));
    core.on_pointer_move(pt(420.0, 300.0));
    core.on_pointer_move(pt(400.0, 300.0));
    core.on_pointer_up(pt(400.0, 300.0));
    assert_eq!(core.entity(0).unwrap().angle, 0.0);
}

#[test]
fn drag_is_unclamped_by_default() {
    let mut core = core();
    core.add_furniture("sofa");
    drag(&mut core, pt(400.0, 300.0), -1000.0, 1000.0);
    let sofa = core.entity(0).unwrap();
    assert_eq!((sofa.x, sofa.y), (-660.0, 1270.0));
}

#[test]
fn clamped_drag_stays_inside_inset() {
    let mut core = clamped_core();
    core.add_furniture("sofa"); // 120 x 60
    drag(&mut core, pt(400.0, 300.0), -1000.0, 1000.0);
    let sofa = core.entity(0).unwrap();
    assert_eq!((sofa.x, sofa.y), (10.0, 530.0));

    drag(&mut core, pt(20.0, 540.0), 5000.0, -5000.0);
    let sofa = core.entity(0).unwrap();
    assert_eq!((sofa.x, sofa.y), (670.0, 10.0));
}

#[test]
fn clamp_prefers_inset_when_room_is_too_small() {
    assert_eq!(clamp_axis(50.0, 200.0, 100.0), CLAMP_INSET_PX);
}

// =============================================================
// Hover
// =============================================================

#[test]
fn hover_reports_grab_over_entity() {
    let mut core = core();
    core.add_furniture("desk");
    assert_eq!(core.on_pointer_move(pt(400.0, 300.0)), vec![cursor("grab")]);
    assert_eq!(core.on_pointer_move(pt(5.0, 5.0)), vec![cursor("default")]);
}

// =============================================================
// Simulation
// =============================================================

#[test]
fn step_spawns_per_frame_count() {
    let mut core = core();
    core.add_device("fan");
    let stats = core.step();
    assert_eq!(stats.spawned, 12);
    assert_eq!(core.particles.len(), 12);
}

#[test]
fn furniture_never_emits() {
    let mut core = core();
    core.add_furniture("sofa");
    core.add_furniture("tv");
    assert_eq!(core.step(), StepStats::default());
    assert!(core.particles.is_empty());
}

#[test]
fn same_seed_same_particles() {
    let mut a = core();
    let mut b = core();
    for c in [&mut a, &mut b] {
        c.add_device("fan");
        c.add_device("ac");
        for _ in 0..5 {
            c.step();
        }
    }
    assert_eq!(a.particles.as_slice(), b.particles.as_slice());
}

// =============================================================
// Templates and snapshot
// =============================================================

#[test]
fn load_template_replaces_scene() {
    let mut core = core();
    core.add_device("fan");
    core.step();
    let placed = core.load_template(RoomTemplate::OneBedroom);
    assert_eq!(placed, 3);
    assert_eq!(core.registry.len(), 3);
    assert!(core.particles.is_empty());
    assert_eq!(core.room_template(), RoomTemplate::OneBedroom);
    let bed = core.entity(0).unwrap();
    assert_eq!((bed.type_key.as_str(), bed.x, bed.y), ("bed", 50.0, 50.0));
}

#[test]
fn custom_template_empties_plan() {
    let mut core = core();
    core.load_template(RoomTemplate::Studio);
    assert_eq!(core.load_template(RoomTemplate::Custom), 0);
    assert!(core.registry.is_empty());
}

#[test]
fn snapshot_carries_settings() {
    let mut core = core();
    core.load_template(RoomTemplate::Studio);
    core.set_ac_temp(24.5);
    let snap = core.snapshot();
    assert_eq!(snap.ac_temp, 24.5);
    assert_eq!(snap.room_template, "studio");
    assert_eq!(snap.canvas_size.width, 800.0);
    assert_eq!(snap.items.len(), 2);
}

// =============================================================
// End to end
// =============================================================

#[test]
fn fan_spawn_click_drag_scenario() {
    let mut core = core();

    let idx = core.add_device("fan").unwrap();
    assert_eq!(core.registry.len(), 1);
    let fan = core.entity(idx).unwrap();
    assert_eq!(fan.kind, EntityKind::Fan);
    assert_eq!(fan.angle, 0.0);

    core.step();
    assert_eq!(core.particles.len(), 12);

    let center = core.entity(idx).unwrap().center();
    click(&mut core, center);
    assert!((core.entity(idx).unwrap().angle - FRAC_PI_4).abs() < 1e-12);

    let before = core.entity(idx).unwrap().clone();
    drag(&mut core, center, 50.0, -20.0);
    let after = core.entity(idx).unwrap();
    assert_eq!(after.x - before.x, 50.0);
    assert_eq!(after.y - before.y, -20.0);
    assert!((after.angle - FRAC_PI_4).abs() < 1e-12);
}
