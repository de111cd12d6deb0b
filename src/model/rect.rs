//! Rectangle types in canonical XYXY format, plus surface geometry.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::coord::Unit;
use super::space::{Percent, Pixel};

/// An axis-aligned rectangle in XYXY format (`x`, `y` top-left; `x1`, `y1`
/// bottom-right).
///
/// The `TSpace` parameter should be either [`Pixel`] or [`Percent`], so that
/// a pixel rectangle can never be stored where a percentage one is expected.
///
/// Note: This type does NOT enforce that `x <= x1` in the constructor.
/// Callers that need an ordered rectangle check [`Rect::is_ordered`].
#[derive(Clone, Copy, PartialEq)]
pub struct Rect<TSpace> {
    pub x: f64,
    pub y: f64,
    pub x1: f64,
    pub y1: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Rect<TSpace> {
    /// Creates a new rectangle from explicit corner coordinates.
    #[inline]
    pub fn from_xyxy(x: f64, y: f64, x1: f64, y1: f64) -> Self {
        Self {
            x,
            y,
            x1,
            y1,
            _space: PhantomData,
        }
    }

    /// Creates a rectangle from its top-left corner and extent.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    /// Returns `(x, y, width, height)`.
    #[inline]
    pub fn to_xywh(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.width(), self.height())
    }

    /// Returns the width of the rectangle.
    ///
    /// May be negative if the rectangle is inverted.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x
    }

    /// Returns the height of the rectangle.
    ///
    /// May be negative if the rectangle is inverted.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Returns true if the rectangle is properly ordered (`x <= x1`, `y <= y1`).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.x <= self.x1 && self.y <= self.y1
    }

    /// Returns true if the point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x1 && py >= self.y && py <= self.y1
    }
}

impl<TSpace> std::fmt::Debug for Rect<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rect")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("x1", &self.x1)
            .field("y1", &self.y1)
            .finish()
    }
}

impl<TSpace> Default for Rect<TSpace> {
    fn default() -> Self {
        Self::from_xyxy(0.0, 0.0, 0.0, 0.0)
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for Rect<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Rect", 4)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.serialize_field("x1", &self.x1)?;
        state.serialize_field("y1", &self.y1)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Rect<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RectData {
            x: f64,
            y: f64,
            x1: f64,
            y1: f64,
        }
        let data = RectData::deserialize(deserializer)?;
        Ok(Rect::from_xyxy(data.x, data.y, data.x1, data.y1))
    }
}

/// Conversion between pixel and percentage rectangles without rounding.
///
/// The rounding rules for stored positions live in
/// [`normalize`](super::normalize); these are the raw scalings.
impl Rect<Pixel> {
    /// Scales pixel coordinates to percentages of `size`.
    pub fn scale_to_percent(&self, size: Size) -> Rect<Percent> {
        Rect::from_xyxy(
            100.0 * self.x / size.width,
            100.0 * self.y / size.height,
            100.0 * self.x1 / size.width,
            100.0 * self.y1 / size.height,
        )
    }
}

impl Rect<Percent> {
    /// Scales percentages back to pixel coordinates of `size`.
    pub fn to_pixel(&self, size: Size) -> Rect<Pixel> {
        Rect::from_xyxy(
            self.x * size.width / 100.0,
            self.y * size.height / 100.0,
            self.x1 * size.width / 100.0,
            self.y1 * size.height / 100.0,
        )
    }
}

/// Width and height of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if both dimensions are finite and strictly positive.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The surface's bounding box, in the same frame as pointer events.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the width and height of the bounds.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A freshly drawn rectangle handed to the creation path.
///
/// The caller computes it from its own drag-to-create gesture, in either
/// unit. Unlike stored positions it is expressed as origin plus extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateRect {
    pub unit: Unit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CandidateRect {
    /// A candidate measured in surface pixels.
    pub fn pixels(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: Unit::Pixel,
            x,
            y,
            width,
            height,
        }
    }

    /// A candidate already expressed as surface percentages.
    pub fn percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: Unit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the extent exceeds one unit on both axes.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width > 1.0 && self.height > 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_xywh() {
        let rect: Rect<Pixel> = Rect::from_xywh(10.0, 20.0, 90.0, 60.0);
        assert_eq!(rect.x1, 100.0);
        assert_eq!(rect.y1, 80.0);
        assert_eq!(rect.to_xywh(), (10.0, 20.0, 90.0, 60.0));
    }

    #[test]
    fn test_rect_ordering() {
        let ordered: Rect<Percent> = Rect::from_xyxy(10.0, 20.0, 30.0, 40.0);
        assert!(ordered.is_ordered());

        let inverted: Rect<Percent> = Rect::from_xyxy(30.0, 20.0, 10.0, 40.0);
        assert!(!inverted.is_ordered());
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect: Rect<Pixel> = Rect::from_xyxy(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(!rect.contains(9.9, 15.0));
    }

    #[test]
    fn test_percent_pixel_scaling() {
        let size = Size::new(200.0, 100.0);
        let px: Rect<Pixel> = Rect::from_xyxy(20.0, 10.0, 60.0, 30.0);
        let pct = px.scale_to_percent(size);
        assert_eq!(pct, Rect::from_xyxy(10.0, 10.0, 30.0, 30.0));
        assert_eq!(pct.to_pixel(size), px);
    }

    #[test]
    fn test_candidate_validity() {
        assert!(CandidateRect::pixels(0.0, 0.0, 1.5, 2.0).is_valid());
        assert!(!CandidateRect::pixels(0.0, 0.0, 1.0, 20.0).is_valid());
        assert!(!CandidateRect::percent(0.0, 0.0, 20.0, 0.5).is_valid());
        assert!(!CandidateRect::pixels(f64::NAN, 0.0, 20.0, 20.0).is_valid());
    }

    #[test]
    fn test_size_usable() {
        assert!(Size::new(1.0, 1.0).is_usable());
        assert!(!Size::new(0.0, 10.0).is_usable());
        assert!(!Size::new(10.0, f64::INFINITY).is_usable());
    }
}
