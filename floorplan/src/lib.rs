//! Floor-plan airflow sketchpad engine.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and natively
//! for tests and the CLI. It owns the placed furniture and air devices, the
//! pointer gesture that moves and rotates them, and the particle field that
//! visualizes airflow from every fan and air conditioner. The page supplies
//! only a canvas and a handful of buttons; [`boot`] wires them up when built
//! with the `hydrate` feature.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`error`] | Browser-facing engine errors |
//! | [`preset`] | Immutable per-type geometry, color and emission presets |
//! | [`entity`] | Placed entities and the append-ordered registry |
//! | [`viewport`] | Canvas size, device pixel ratio and coordinate conversion |
//! | [`input`] | Pointer gesture state machine |
//! | [`hit`] | Top-most bounding-box hit-testing |
//! | [`particle`] | Particle pool, advection and culling |
//! | [`emission`] | Per-frame particle emission from devices |
//! | [`render`] | Canvas 2D drawing of particles and entities |
//! | [`frame_loop`] | Bounded and animation-frame step drivers |
//! | [`template`] | Starter room layouts |
//! | [`snapshot`] | Scene snapshot and suggestion wire types |
//! | [`consts`] | Shared numeric constants (rotation step, particle ranges, etc.) |

#[cfg(feature = "hydrate")]
pub mod boot;
pub mod consts;
pub mod emission;
pub mod engine;
pub mod entity;
pub mod error;
pub mod frame_loop;
pub mod hit;
pub mod input;
pub mod particle;
pub mod preset;
pub mod render;
pub mod snapshot;
pub mod template;
pub mod viewport;
