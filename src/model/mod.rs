//! Data model for annotation records.
//!
//! This module defines how annotations are represented at rest and how their
//! coordinates move between the two frames the engine works in.
//!
//! # Design Principles
//!
//! 1. **Explicit units**: every stored coordinate carries a [`Unit`] rather
//!    than a `%` suffix inside a string.
//!
//! 2. **Typed frames**: transient geometry uses [`Rect<Pixel>`] or
//!    [`Rect<Percent>`], so the two frames cannot be mixed by accident.
//!
//! 3. **Guarded store**: the [`AnnotationStore`] refuses records that would
//!    break identifier uniqueness or rectangle ordering.
//!
//! # Example
//!
//! ```
//! use annorect::model::{normalize, CandidateRect, Size};
//!
//! let position = normalize::candidate_position(
//!     &CandidateRect::pixels(20.0, 10.0, 40.0, 20.0),
//!     Size::new(200.0, 100.0),
//! )
//! .unwrap();
//! assert_eq!(position.x1.to_string(), "30.000%");
//! ```

mod coord;
mod ids;
pub mod io_json;
pub mod normalize;
mod record;
mod rect;
mod space;
mod store;
mod tag;

// Re-export core types for convenient access
pub use coord::{Coord, Unit};
pub use ids::{IdGenerator, OwnerId, RandomIds, SequentialIds, TagId};
pub use record::{AnnotationRecord, Position, RecordInput};
pub use rect::{Bounds, CandidateRect, Rect, Size};
pub use space::{Percent, Pixel};
pub use store::AnnotationStore;
pub use tag::{Tag, TagInput};
