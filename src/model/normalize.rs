//! Coordinate normalization between pixel and percentage frames.
//!
//! Stored positions are percentages of the surface with three fractional
//! digits. Extents are normalized directly from `x1 - x` (and `y1 - y`) and
//! the far corner is rebuilt from origin plus extent, so rounding error does
//! not compound across the two corners.

use super::coord::Unit;
use super::record::Position;
use super::rect::{CandidateRect, Rect, Size};
use super::space::{Percent, Pixel};
use crate::error::GeometryError;

/// Rounds a percentage to the stored precision (three decimal digits).
#[inline]
pub fn round_percent(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Formats a percentage the way it is exported: `"12.345%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.3}%", value)
}

/// Converts a pixel rectangle into a rounded percentage rectangle.
///
/// # Errors
/// Fails if the surface has no usable size or the rectangle is not finite.
pub fn to_percent(rect: &Rect<Pixel>, surface: Size) -> Result<Rect<Percent>, GeometryError> {
    check_surface(surface)?;
    if !rect.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    let x = round_percent(100.0 * rect.x / surface.width);
    let y = round_percent(100.0 * rect.y / surface.height);
    let width = round_percent(100.0 * rect.width() / surface.width);
    let height = round_percent(100.0 * rect.height() / surface.height);
    Ok(Rect::from_xyxy(
        x,
        y,
        round_percent(x + width),
        round_percent(y + height),
    ))
}

/// Rounds the components of a percentage rectangle to stored precision.
///
/// The far corner is derived from the rounded origin and extent.
pub fn round_rect(rect: &Rect<Percent>) -> Rect<Percent> {
    let x = round_percent(rect.x);
    let y = round_percent(rect.y);
    Rect::from_xyxy(
        x,
        y,
        round_percent(x + round_percent(rect.width())),
        round_percent(y + round_percent(rect.height())),
    )
}

/// Normalizes a stored position against `surface`.
///
/// A position whose `x` is already a percentage is returned unchanged;
/// otherwise all four values are treated as pixels.
///
/// # Errors
/// Fails for pixel positions when the surface has no usable size.
pub fn normalize_position(position: &Position, surface: Size) -> Result<Position, GeometryError> {
    match position.unit() {
        Unit::Percent => Ok(*position),
        Unit::Pixel => Ok(Position::from_percent(to_percent(
            &position.raw_pixels(),
            surface,
        )?)),
    }
}

/// Normalizes a freshly drawn rectangle into a stored position.
///
/// # Errors
/// Fails when the candidate spans one unit or less on either axis, or when a
/// pixel candidate cannot be scaled against `surface`.
pub fn candidate_position(
    candidate: &CandidateRect,
    surface: Size,
) -> Result<Position, GeometryError> {
    if !candidate.is_valid() {
        return Err(GeometryError::Degenerate {
            width: candidate.width,
            height: candidate.height,
        });
    }
    let rect = match candidate.unit {
        Unit::Pixel => to_percent(
            &Rect::from_xywh(candidate.x, candidate.y, candidate.width, candidate.height),
            surface,
        )?,
        Unit::Percent => round_rect(&Rect::from_xywh(
            candidate.x,
            candidate.y,
            candidate.width,
            candidate.height,
        )),
    };
    Ok(Position::from_percent(rect))
}

/// Resolves a stored position into a percentage rectangle for display.
///
/// # Errors
/// Same conditions as [`normalize_position`], plus non-finite values.
pub fn display_rect(position: &Position, surface: Size) -> Result<Rect<Percent>, GeometryError> {
    if !position.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    Ok(normalize_position(position, surface)?.raw_percent())
}

/// Scales a stored position back into surface pixels.
///
/// Pixel positions are returned as they are.
pub fn to_pixels(position: &Position, surface: Size) -> Rect<Pixel> {
    match position.unit() {
        Unit::Percent => position.raw_percent().to_pixel(surface),
        Unit::Pixel => position.raw_pixels(),
    }
}

fn check_surface(surface: Size) -> Result<(), GeometryError> {
    if surface.is_usable() {
        Ok(())
    } else {
        Err(GeometryError::EmptySurface {
            width: surface.width,
            height: surface.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coord;

    #[test]
    fn test_drawn_rect_scenario() {
        let surface = Size::new(200.0, 100.0);
        let pos = candidate_position(&CandidateRect::pixels(20.0, 10.0, 40.0, 20.0), surface)
            .unwrap();
        assert_eq!(pos.x.to_string(), "10.000%");
        assert_eq!(pos.y.to_string(), "10.000%");
        assert_eq!(pos.x1.to_string(), "30.000%");
        assert_eq!(pos.y1.to_string(), "30.000%");
    }

    #[test]
    fn test_percent_positions_pass_through() {
        let pos = Position {
            x: Coord::percent(12.3456),
            y: Coord::percent(1.0),
            x1: Coord::percent(50.0),
            y1: Coord::percent(60.0),
        };
        let out = normalize_position(&pos, Size::new(640.0, 480.0)).unwrap();
        assert_eq!(out, pos);
        // Even an unusable surface does not matter for percentages.
        assert_eq!(normalize_position(&pos, Size::new(0.0, 0.0)).unwrap(), pos);
    }

    #[test]
    fn test_three_digit_rounding() {
        let rect = to_percent(&Rect::from_xyxy(1.0, 1.0, 2.0, 2.0), Size::new(3.0, 3.0)).unwrap();
        assert_eq!(rect.x, 33.333);
        assert_eq!(format_percent(rect.x), "33.333%");
    }

    #[test]
    fn test_far_corner_is_origin_plus_extent() {
        // Rounding both corners independently would give 66.667 here.
        let rect = to_percent(&Rect::from_xyxy(1.0, 1.0, 2.0, 2.0), Size::new(3.0, 3.0)).unwrap();
        assert_eq!(rect.x1, 66.666);
        assert_eq!(format_percent(rect.y1), "66.666%");
    }

    #[test]
    fn test_empty_surface_is_rejected() {
        let err = to_percent(&Rect::from_xyxy(0.0, 0.0, 5.0, 5.0), Size::new(0.0, 10.0));
        assert!(matches!(err, Err(GeometryError::EmptySurface { .. })));
    }

    #[test]
    fn test_degenerate_candidate_is_rejected() {
        let err = candidate_position(&CandidateRect::pixels(0.0, 0.0, 1.0, 50.0), Size::new(10.0, 10.0));
        assert!(matches!(err, Err(GeometryError::Degenerate { .. })));
    }

    #[test]
    fn test_percent_candidate() {
        let pos = candidate_position(
            &CandidateRect::percent(5.0, 5.0, 12.5, 20.0),
            Size::new(0.0, 0.0),
        )
        .unwrap();
        assert_eq!(pos.x1, Coord::percent(17.5));
        assert_eq!(pos.y1, Coord::percent(25.0));
    }

    #[test]
    fn test_to_pixels() {
        let pos = Position::from_percent(Rect::from_xyxy(10.0, 10.0, 30.0, 30.0));
        let px = to_pixels(&pos, Size::new(200.0, 100.0));
        assert_eq!(px, Rect::from_xyxy(20.0, 10.0, 60.0, 30.0));
    }
}
