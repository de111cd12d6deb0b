//! An in-memory surface with pointer hit-testing.

use super::{HandleVisibility, Label, Overlay, PointerTarget, Surface};
use crate::model::{Bounds, OwnerId, Percent, Pixel, Rect};
use crate::movement::Handle;

/// Distance from a handle's centre, in pixels, that still counts as a hit.
pub const HANDLE_HIT_RADIUS: f64 = 4.0;

/// A surface that keeps overlays as plain values.
///
/// Used for replaying sessions without a UI and as the reference surface in
/// tests. Overlays are stacked in materialization order; later ones are on
/// top.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    bounds: Bounds,
    overlays: Vec<Overlay>,
}

impl HeadlessSurface {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            overlays: Vec::new(),
        }
    }

    /// Changes the bounding box, e.g. after the host resized the image.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, owner: &OwnerId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| &o.owner == owner)
    }

    /// Overlay geometry in the pointer frame.
    pub fn pixel_rect(&self, rect: &Rect<Percent>) -> Rect<Pixel> {
        let px = rect.to_pixel(self.bounds.size());
        Rect::from_xyxy(
            px.x + self.bounds.x,
            px.y + self.bounds.y,
            px.x1 + self.bounds.x,
            px.y1 + self.bounds.y,
        )
    }

    /// Classifies a pointer position: the topmost overlay's visible handle,
    /// then its body, else empty.
    pub fn hit_test(&self, x: f64, y: f64) -> PointerTarget {
        for overlay in self.overlays.iter().rev() {
            let rect = self.pixel_rect(&overlay.rect);
            if overlay.handles == HandleVisibility::All {
                if let Some(handle) = hit_handle(&rect, x, y) {
                    return PointerTarget::Handle {
                        owner: overlay.owner.clone(),
                        handle,
                    };
                }
            }
            if rect.contains(x, y) {
                return PointerTarget::Body {
                    owner: overlay.owner.clone(),
                };
            }
        }
        PointerTarget::Empty
    }

    fn overlay_mut(&mut self, owner: &OwnerId) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|o| &o.owner == owner)
    }
}

fn hit_handle(rect: &Rect<Pixel>, x: f64, y: f64) -> Option<Handle> {
    // Corners win over edge midpoints on small overlays.
    let mut order = Handle::ALL;
    order.rotate_left(4);
    order.into_iter().find(|handle| {
        let (fx, fy) = handle.anchor();
        let hx = rect.x + fx * rect.width();
        let hy = rect.y + fy * rect.height();
        (x - hx).hypot(y - hy) <= HANDLE_HIT_RADIUS
    })
}

impl Surface for HeadlessSurface {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn materialize(&mut self, overlay: Overlay) {
        self.overlays.retain(|o| o.owner != overlay.owner);
        self.overlays.push(overlay);
    }

    fn set_geometry(&mut self, owner: &OwnerId, rect: Rect<Percent>) {
        if let Some(overlay) = self.overlay_mut(owner) {
            overlay.rect = rect;
        }
    }

    fn set_selected(&mut self, owner: &OwnerId, selected: bool) {
        if let Some(overlay) = self.overlay_mut(owner) {
            overlay.selected = selected;
        }
    }

    fn set_handles(&mut self, owner: &OwnerId, visibility: HandleVisibility) {
        if let Some(overlay) = self.overlay_mut(owner) {
            overlay.handles = visibility;
        }
    }

    fn set_label(&mut self, owner: &OwnerId, label: Label) {
        if let Some(overlay) = self.overlay_mut(owner) {
            overlay.label = label;
        }
    }

    fn remove(&mut self, owner: &OwnerId) {
        self.overlays.retain(|o| &o.owner != owner);
    }

    fn clear(&mut self) {
        self.overlays.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Options;
    use crate::surface::ControlLayout;

    fn overlay(owner: &str, rect: Rect<Percent>, handles: HandleVisibility) -> Overlay {
        Overlay {
            owner: OwnerId::new(owner),
            rect,
            class: "annotation".into(),
            label: Label::default(),
            handles,
            layout: ControlLayout::from_options(&Options::default()),
            selected: false,
        }
    }

    fn surface() -> HeadlessSurface {
        let mut surface = HeadlessSurface::new(Bounds::new(10.0, 20.0, 200.0, 100.0));
        surface.materialize(overlay(
            "a",
            Rect::from_xyxy(10.0, 10.0, 50.0, 50.0),
            HandleVisibility::All,
        ));
        surface
    }

    #[test]
    fn test_pixel_rect_is_offset_by_bounds() {
        let s = surface();
        let rect = s.pixel_rect(&Rect::from_xyxy(10.0, 10.0, 50.0, 50.0));
        assert_eq!(rect, Rect::from_xyxy(30.0, 30.0, 110.0, 70.0));
    }

    #[test]
    fn test_hit_test_classifies_targets() {
        let s = surface();
        let owner = OwnerId::new("a");
        assert_eq!(
            s.hit_test(31.0, 31.0),
            PointerTarget::Handle {
                owner: owner.clone(),
                handle: Handle::TopLeft
            }
        );
        assert_eq!(
            s.hit_test(110.0, 50.0),
            PointerTarget::Handle {
                owner: owner.clone(),
                handle: Handle::Right
            }
        );
        assert_eq!(s.hit_test(60.0, 50.0), PointerTarget::Body { owner });
        assert_eq!(s.hit_test(150.0, 50.0), PointerTarget::Empty);
    }

    #[test]
    fn test_hidden_handles_are_not_hit() {
        let mut s = surface();
        s.set_handles(&OwnerId::new("a"), HandleVisibility::Hidden);
        assert_eq!(
            s.hit_test(30.0, 30.0),
            PointerTarget::Body {
                owner: OwnerId::new("a")
            }
        );
    }

    #[test]
    fn test_topmost_overlay_wins() {
        let mut s = surface();
        s.materialize(overlay(
            "b",
            Rect::from_xyxy(20.0, 20.0, 40.0, 40.0),
            HandleVisibility::Hidden,
        ));
        assert_eq!(
            s.hit_test(70.0, 50.0),
            PointerTarget::Body {
                owner: OwnerId::new("b")
            }
        );
    }

    #[test]
    fn test_materialize_replaces_same_owner() {
        let mut s = surface();
        s.materialize(overlay(
            "a",
            Rect::from_xyxy(0.0, 0.0, 5.0, 5.0),
            HandleVisibility::Hidden,
        ));
        assert_eq!(s.overlays().len(), 1);
        s.remove(&OwnerId::new("a"));
        assert!(s.overlays().is_empty());
    }
}
