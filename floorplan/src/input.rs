//! Input model: the pointer gesture state machine.
//!
//! A gesture runs `Idle → Pressed → (Dragging | released) → Idle`. `Pressed`
//! means an entity is held but the pointer has not moved since the press;
//! releasing in that state is a click. Any move while an entity is held
//! switches to `Dragging`, after which a release never rotates.
//!
//! There is a single pointer and at most one session at a time. The
//! transitions themselves live on [`crate::engine::EngineCore`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::Point;

/// Active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No entity held.
    #[default]
    Idle,
    /// An entity is held and the pointer has not moved since the press.
    Pressed {
        /// Index of the held entity in the registry.
        index: usize,
        /// Pointer minus the entity's top-left at press time.
        offset: Point,
        /// Floor-plan position of the press.
        press: Point,
    },
    /// The held entity is following the pointer.
    Dragging {
        /// Index of the held entity in the registry.
        index: usize,
        /// Pointer minus the entity's top-left at press time.
        offset: Point,
    },
}

impl InputState {
    /// Index of the held entity, if any.
    #[must_use]
    pub fn held(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Pressed { index, .. } | Self::Dragging { index, .. } => Some(index),
        }
    }

    /// Offset between the pointer and the held entity's top-left.
    #[must_use]
    pub fn offset(&self) -> Option<Point> {
        match *self {
            Self::Idle => None,
            Self::Pressed { offset, .. } | Self::Dragging { offset, .. } => Some(offset),
        }
    }

    /// Whether the pointer has moved since the press.
    #[must_use]
    pub fn moved(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
