//! The geometry collaborator behind move and resize gestures.
//!
//! The engine never computes geometry itself. When a gesture starts it asks a
//! [`MovementFactory`] for a [`Movement`] bound to the targeted annotation,
//! feeds it pointer deltas while the gesture runs, and reads the resulting
//! rectangle back when the gesture commits. [`RectMovement`] is the solver
//! used when the host does not bring its own.

mod rect;

pub use rect::{RectMovement, RectMovementFactory};

use serde::{Deserialize, Serialize};

use crate::engine::Options;
use crate::model::{Bounds, OwnerId, Percent, Rect};

/// One of the eight resize handles around an overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    /// All handles, edges first.
    pub const ALL: [Handle; 8] = [
        Handle::Top,
        Handle::Bottom,
        Handle::Left,
        Handle::Right,
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    /// Which edges this handle drags: `(left, top, right, bottom)`.
    pub fn edges(self) -> (bool, bool, bool, bool) {
        match self {
            Handle::Top => (false, true, false, false),
            Handle::Bottom => (false, false, false, true),
            Handle::Left => (true, false, false, false),
            Handle::Right => (false, false, true, false),
            Handle::TopLeft => (true, true, false, false),
            Handle::TopRight => (false, true, true, false),
            Handle::BottomLeft => (true, false, false, true),
            Handle::BottomRight => (false, false, true, true),
        }
    }

    /// Position of the handle on `rect`, as fractions of width and height.
    pub fn anchor(self) -> (f64, f64) {
        match self {
            Handle::Top => (0.5, 0.0),
            Handle::Bottom => (0.5, 1.0),
            Handle::Left => (0.0, 0.5),
            Handle::Right => (1.0, 0.5),
            Handle::TopLeft => (0.0, 0.0),
            Handle::TopRight => (1.0, 0.0),
            Handle::BottomLeft => (0.0, 1.0),
            Handle::BottomRight => (1.0, 1.0),
        }
    }
}

/// What a gesture does to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "handle")]
pub enum MoveMode {
    /// Drag one edge or corner.
    Resize(Handle),
    /// Translate the whole rectangle.
    FreeMove,
    /// Bound to a target without manipulating it.
    SelectOnly,
}

/// The annotation a movement starts from.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementTarget {
    pub owner: OwnerId,
    pub rect: Rect<Percent>,
}

/// An in-progress manipulation of one overlay.
pub trait Movement {
    /// The annotation this movement is bound to.
    fn owner(&self) -> &OwnerId;

    fn mode(&self) -> MoveMode;

    /// Applies a pointer delta in surface pixels.
    fn transform(&mut self, dx: f64, dy: f64);

    /// The target's current geometry as surface percentages.
    fn geometry(&self) -> Rect<Percent>;
}

/// Creates movements for gestures.
pub trait MovementFactory {
    type Movement: Movement;

    /// Binds a movement to `target` for the given mode.
    fn begin(
        &mut self,
        target: MovementTarget,
        mode: MoveMode,
        bounds: Bounds,
        options: &Options,
    ) -> Self::Movement;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_handles_drag_two_edges() {
        for handle in Handle::ALL {
            let (l, t, r, b) = handle.edges();
            let count = [l, t, r, b].iter().filter(|e| **e).count();
            let (fx, fy) = handle.anchor();
            let is_corner = (fx == 0.0 || fx == 1.0) && (fy == 0.0 || fy == 1.0);
            assert_eq!(count, if is_corner { 2 } else { 1 }, "{:?}", handle);
            assert!(!(l && r) && !(t && b));
        }
    }

    #[test]
    fn test_move_mode_serde() {
        let json = serde_json::to_string(&MoveMode::Resize(Handle::TopLeft)).unwrap();
        assert_eq!(json, r#"{"kind":"resize","handle":"top-left"}"#);
        let mode: MoveMode = serde_json::from_str(r#"{"kind":"free-move"}"#).unwrap();
        assert_eq!(mode, MoveMode::FreeMove);
    }
}
