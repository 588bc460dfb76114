//! Frame loop: the one perpetual task.
//!
//! Each frame runs emission, advection and culling, then renders. In the
//! browser the loop re-schedules itself through `requestAnimationFrame` until
//! its [`CancelToken`] is cancelled. [`FrameLoop::run_steps`] drives the same
//! step a bounded number of times without a display, for tests and the CLI.

#[cfg(test)]
#[path = "frame_loop_test.rs"]
mod frame_loop_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::emission::StepStats;
use crate::engine::EngineCore;

/// Single-threaded cancellation flag. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Bounded, display-free driver for [`EngineCore::step`].
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    token: CancelToken,
    frames: u64,
    totals: StepStats,
}

impl FrameLoop {
    #[must_use]
    pub fn new(token: CancelToken) -> Self {
        Self { token, frames: 0, totals: StepStats::default() }
    }

    #[must_use]
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Run up to `n` frame steps, stopping early once the token is cancelled.
    /// Returns the number of steps actually run.
    pub fn run_steps(&mut self, core: &mut EngineCore, n: usize) -> usize {
        for done in 0..n {
            if self.token.is_cancelled() {
                return done;
            }
            let stats = core.step();
            self.frames += 1;
            self.totals.spawned += stats.spawned;
            self.totals.culled += stats.culled;
            self.totals.skipped += stats.skipped;
        }
        n
    }

    /// Frames run over the lifetime of this loop.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Step counters summed over every frame run.
    #[must_use]
    pub fn totals(&self) -> StepStats {
        self.totals
    }
}

#[cfg(feature = "hydrate")]
pub use browser::{LoopHandle, start};

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::Window;

    use super::CancelToken;
    use crate::engine::Engine;

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Control handle for a running browser loop.
    pub struct LoopHandle {
        token: CancelToken,
        raf_id: Rc<Cell<Option<i32>>>,
        callback: FrameCallback,
    }

    impl LoopHandle {
        /// Cancel the loop and any pending animation frame.
        pub fn stop(&self) {
            if !self.is_running() {
                return;
            }
            self.token.cancel();
            if let (Some(id), Some(window)) = (self.raf_id.take(), web_sys::window()) {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {e:?}");
                }
            }
            // Breaks the closure's reference to itself.
            self.callback.borrow_mut().take();
            log::info!("frame loop stopped");
        }

        #[must_use]
        pub fn is_running(&self) -> bool {
            !self.token.is_cancelled()
        }
    }

    /// Start stepping and rendering `engine` on every animation frame.
    ///
    /// Without a window the returned handle is already stopped.
    pub fn start(engine: Rc<RefCell<Engine>>) -> LoopHandle {
        let token = CancelToken::new();
        let raf_id = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = LoopHandle { token: token.clone(), raf_id: Rc::clone(&raf_id), callback: Rc::clone(&callback) };

        let Some(window) = web_sys::window() else {
            log::warn!("no window; frame loop not started");
            token.cancel();
            return handle;
        };

        let window_for_cb = window.clone();
        let raf_for_cb = Rc::clone(&raf_id);
        let callback_for_cb = Rc::clone(&callback);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            raf_for_cb.set(None);
            if token.is_cancelled() {
                return;
            }
            match engine.try_borrow_mut() {
                Ok(mut engine) => {
                    engine.step();
                    if let Err(e) = engine.render() {
                        log::warn!("render failed: {e:?}");
                    }
                }
                Err(_) => log::debug!("engine busy; skipping frame"),
            }
            if !request_frame(&window_for_cb, &callback_for_cb, &raf_for_cb) {
                token.cancel();
            }
        }) as Box<dyn FnMut(f64)>));

        if request_frame(&window, &callback, &raf_id) {
            log::info!("frame loop started");
        } else {
            handle.token.cancel();
        }
        handle
    }

    fn request_frame(window: &Window, callback: &FrameCallback, raf_id: &Cell<Option<i32>>) -> bool {
        let borrowed = callback.borrow();
        let Some(cb) = borrowed.as_ref() else {
            return false;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => {
                raf_id.set(Some(id));
                true
            }
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {e:?}");
                false
            }
        }
    }
}
