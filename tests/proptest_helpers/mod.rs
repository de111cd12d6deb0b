#![allow(dead_code)]

use annorect::model::{Bounds, CandidateRect, Rect, Size};
use annorect::model::{Percent, Pixel};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Absolute tolerance for a percent round-trip at three decimal digits.
pub const EPS_PERCENT: f64 = 1e-3;

/// Tolerance for pixels recovered from stored percentages on `size`.
pub fn eps_pixels(size: Size) -> f64 {
    size.width.max(size.height) * EPS_PERCENT / 100.0 + 1e-9
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_size() -> impl Strategy<Value = Size> {
    (16u32..=4096, 16u32..=4096).prop_map(|(w, h)| Size::new(w as f64, h as f64))
}

pub fn arb_bounds() -> impl Strategy<Value = Bounds> {
    (0u32..200, 0u32..200, arb_size())
        .prop_map(|(x, y, size)| Bounds::new(x as f64, y as f64, size.width, size.height))
}

/// A pixel rectangle that fits inside `size`.
pub fn arb_pixel_rect_in(size: Size) -> impl Strategy<Value = Rect<Pixel>> {
    (0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64).prop_map(move |(a, b, c, d)| {
        let (x0, x1) = if a <= b { (a, b) } else { (b, a) };
        let (y0, y1) = if c <= d { (c, d) } else { (d, c) };
        Rect::from_xyxy(
            x0 * size.width,
            y0 * size.height,
            x1 * size.width,
            y1 * size.height,
        )
    })
}

/// A surface size together with a rectangle on it.
pub fn arb_sized_rect() -> impl Strategy<Value = (Size, Rect<Pixel>)> {
    arb_size().prop_flat_map(|size| (Just(size), arb_pixel_rect_in(size)))
}

/// A stored-precision percentage rectangle.
pub fn arb_percent_rect() -> impl Strategy<Value = Rect<Percent>> {
    (0u32..=100_000, 0u32..=100_000, 0u32..=100_000, 0u32..=100_000).prop_map(|(a, b, c, d)| {
        let v = |n: u32| n as f64 / 1000.0;
        Rect::from_xyxy(v(a.min(b)), v(c.min(d)), v(a.max(b)), v(c.max(d)))
    })
}

/// A drawn candidate, valid or not, in either unit.
pub fn arb_candidate() -> impl Strategy<Value = CandidateRect> {
    (
        any::<bool>(),
        0.0..150.0f64,
        0.0..80.0f64,
        0.0..60.0f64,
        0.0..30.0f64,
    )
        .prop_map(|(percent, x, y, w, h)| {
            if percent {
                CandidateRect::percent(x / 2.0, y, w, h)
            } else {
                CandidateRect::pixels(x, y, w, h)
            }
        })
}

/// Pointer positions, some of them outside the surface or in the dead zone.
pub fn arb_pointer_path(len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-20.0..260.0f64, -20.0..140.0f64), 1..=len)
}
