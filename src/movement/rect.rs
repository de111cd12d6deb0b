//! Default move/resize solver for axis-aligned overlays.

use super::{Movement, MovementFactory, MovementTarget, MoveMode};
use crate::engine::Options;
use crate::model::{Bounds, OwnerId, Percent, Rect};

/// Smallest extent a resize may shrink an overlay to, in surface pixels.
pub const MIN_EXTENT_PX: f64 = 2.0;

/// Smallest extent a resize may shrink an overlay to, in percent. Stored
/// rectangles must stay wider and taller than one percent after rounding.
pub const MIN_EXTENT_PERCENT: f64 = 1.002;

/// Moves or resizes a percentage rectangle, clamped to the surface.
///
/// Pixel deltas are converted to percentages of the bounds captured when the
/// movement began. Non-editable overlays and select-only movements ignore
/// deltas.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMovement {
    owner: OwnerId,
    mode: MoveMode,
    rect: Rect<Percent>,
    bounds: Bounds,
    editable: bool,
}

impl RectMovement {
    pub fn new(target: MovementTarget, mode: MoveMode, bounds: Bounds, editable: bool) -> Self {
        Self {
            owner: target.owner,
            mode,
            rect: target.rect,
            bounds,
            editable,
        }
    }

    fn min_extent(&self) -> (f64, f64) {
        (
            percent_of(MIN_EXTENT_PX, self.bounds.width).max(MIN_EXTENT_PERCENT),
            percent_of(MIN_EXTENT_PX, self.bounds.height).max(MIN_EXTENT_PERCENT),
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let r = &mut self.rect;
        // Keep the whole rectangle on the surface.
        let dx = dx.max(-r.x).min(100.0 - r.x1);
        let dy = dy.max(-r.y).min(100.0 - r.y1);
        r.x += dx;
        r.x1 += dx;
        r.y += dy;
        r.y1 += dy;
    }

    fn resize(&mut self, edges: (bool, bool, bool, bool), dx: f64, dy: f64) {
        let (min_w, min_h) = self.min_extent();
        let (left, top, right, bottom) = edges;
        let r = &mut self.rect;
        if left {
            r.x = (r.x + dx).max(0.0).min(r.x1 - min_w).min(r.x1);
        }
        if right {
            r.x1 = (r.x1 + dx).min(100.0).max(r.x + min_w).max(r.x);
        }
        if top {
            r.y = (r.y + dy).max(0.0).min(r.y1 - min_h).min(r.y1);
        }
        if bottom {
            r.y1 = (r.y1 + dy).min(100.0).max(r.y + min_h).max(r.y);
        }
    }
}

impl Movement for RectMovement {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn mode(&self) -> MoveMode {
        self.mode
    }

    fn transform(&mut self, dx: f64, dy: f64) {
        if !self.editable || !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let dx = percent_of(dx, self.bounds.width);
        let dy = percent_of(dy, self.bounds.height);
        match self.mode {
            MoveMode::SelectOnly => {}
            MoveMode::FreeMove => self.translate(dx, dy),
            MoveMode::Resize(handle) => self.resize(handle.edges(), dx, dy),
        }
    }

    fn geometry(&self) -> Rect<Percent> {
        self.rect
    }
}

/// Hands out [`RectMovement`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RectMovementFactory;

impl MovementFactory for RectMovementFactory {
    type Movement = RectMovement;

    fn begin(
        &mut self,
        target: MovementTarget,
        mode: MoveMode,
        bounds: Bounds,
        options: &Options,
    ) -> RectMovement {
        RectMovement::new(target, mode, bounds, options.editable)
    }
}

fn percent_of(px: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        100.0 * px / extent
    } else {
        0.0
    }
}
