//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! between the two coordinate frames an annotation lives in at compile time.

use std::fmt;

/// Marker type for pixel coordinates (absolute values).
///
/// Pixel coordinates are measured in the same frame as pointer events and
/// are only meaningful while a gesture is being manipulated.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for percentage coordinates (0.0 to 100.0).
///
/// Percentages are relative to the surface's width (x axis) or height
/// (y axis), making stored annotations resolution-independent.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Percent {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Pixel has no variants
    }
}

impl fmt::Debug for Percent {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Percent has no variants
    }
}
